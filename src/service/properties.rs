use crate::db::models::{PropertyInput, PropertyRow};
use crate::db::{Property, SqlitePool};
use crate::error::AppError;
use crate::service::listing::{ListQuery, ListSource, Page, fetch_page};
use crate::service::outcome::{NewRecordId, Notification, SaveOutcome};
use tracing::{debug, info};

impl ListSource for PropertyRow {
    const FROM: &'static str = "properties p JOIN clients c ON c.id = p.client_id";
    const COLUMNS: &'static str =
        "p.id, p.client_id, c.name AS client_name, p.name, p.hectares, p.municipality, p.state";
    const SEARCH_COLUMNS: &'static [&'static str] =
        &["p.name", "p.municipality", "p.state", "c.name"];
    const SORT_COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("nome", "p.name"),
        ("cliente", "c.name"),
        ("hectares", "p.hectares"),
        ("municipio", "p.municipality"),
        ("estado", "p.state"),
    ];
    const TIE_BREAK: &'static str = "p.id";
}

#[derive(Clone)]
pub struct PropertyStore {
    pool: SqlitePool,
}

impl PropertyStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: ListQuery) -> Result<Page<PropertyRow>, AppError> {
        fetch_page::<PropertyRow>(&self.pool, query).await
    }

    pub async fn get(&self, id: i64) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>(
            r#"SELECT id, client_id, name, hectares, municipality, state, coordinates
               FROM properties WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Propriedade {id} não encontrada")))
    }

    async fn client_exists(&self, client_id: i64) -> Result<bool, AppError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM clients WHERE id = ?")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn create(&self, input: PropertyInput) -> Result<SaveOutcome, AppError> {
        if !self.client_exists(input.client_id).await? {
            return Ok(missing_owner());
        }
        let done = sqlx::query(
            r#"INSERT INTO properties (
                client_id, name, hectares, municipality, state, coordinates
            ) VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(input.client_id)
        .bind(&input.name)
        .bind(input.hectares)
        .bind(&input.municipality)
        .bind(&input.state)
        .bind(&input.coordinates)
        .execute(&self.pool)
        .await?;
        let id = NewRecordId::from_rowid(done.last_insert_rowid());
        info!(id = ?id.get(), client_id = input.client_id, "property created");
        Ok(SaveOutcome::Created(id))
    }

    pub async fn update(&self, id: i64, input: PropertyInput) -> Result<SaveOutcome, AppError> {
        if !self.client_exists(input.client_id).await? {
            return Ok(missing_owner());
        }
        let done = sqlx::query(
            r#"UPDATE properties SET
                client_id = ?,
                name = ?,
                hectares = ?,
                municipality = ?,
                state = ?,
                coordinates = ?
              WHERE id = ?"#,
        )
        .bind(input.client_id)
        .bind(&input.name)
        .bind(input.hectares)
        .bind(&input.municipality)
        .bind(&input.state)
        .bind(&input.coordinates)
        .bind(id)
        .execute(&self.pool)
        .await?;
        if done.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Propriedade {id} não encontrada")));
        }
        info!(id, "property updated");
        Ok(SaveOutcome::Updated)
    }

    /// Refuses while consultations or soil analyses still reference the property.
    pub async fn delete(&self, id: i64) -> Result<Notification, AppError> {
        let property = self.get(id).await?;

        let (consultations, analyses): (i64, i64) = sqlx::query_as(
            r#"SELECT
                (SELECT COUNT(*) FROM consultations WHERE property_id = ?),
                (SELECT COUNT(*) FROM soil_analyses WHERE property_id = ?)"#,
        )
        .bind(id)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let dependents = consultations + analyses;
        if dependents > 0 {
            debug!(id, consultations, analyses, "property delete refused");
            return Ok(Notification::error(format!(
                "Não é possível excluir {}: existem {} consulta(s) e {} análise(s) vinculada(s)",
                property.name, consultations, analyses
            )));
        }

        sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        info!(id, "property deleted");
        Ok(Notification::success(format!(
            "Propriedade {} excluída com sucesso",
            property.name
        )))
    }
}

fn missing_owner() -> SaveOutcome {
    SaveOutcome::Rejected(Notification::error("Cliente proprietário não encontrado"))
}
