use crate::db::models::{Client, ClientInput, Consultation, SoilAnalysis};
use crate::db::{Property, SqlitePool};
use crate::error::AppError;
use crate::service::listing::{ListQuery, ListSource, Page, fetch_page};
use crate::service::outcome::{NewRecordId, Notification, SaveOutcome};
use sqlx::Error as SqlxError;
use tracing::{debug, info};

const CLIENT_COLUMNS: &str = "id, name, email, phone, tax_id, registered_at, address, city, state, notes, active";

impl ListSource for Client {
    const FROM: &'static str = "clients";
    const COLUMNS: &'static str = CLIENT_COLUMNS;
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "tax_id", "email", "phone"];
    const SORT_COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("nome", "name"),
        ("email", "email"),
        ("cpf_cnpj", "tax_id"),
        ("cidade", "city"),
        ("data_cadastro", "registered_at"),
    ];
    const TIE_BREAK: &'static str = "id";
}

/// Everything the client detail page shows.
#[derive(Debug, Clone)]
pub struct ClientDetails {
    pub client: Client,
    pub properties: Vec<Property>,
    pub consultations: Vec<Consultation>,
    pub analyses: Vec<SoilAnalysis>,
}

#[derive(Clone)]
pub struct ClientStore {
    pool: SqlitePool,
}

impl ClientStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: ListQuery) -> Result<Page<Client>, AppError> {
        fetch_page::<Client>(&self.pool, query).await
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<Client>, AppError> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY registered_at DESC, id DESC LIMIT ?");
        let rows = sqlx::query_as::<_, Client>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// All clients ordered by name, for owner pickers.
    pub async fn all_names(&self) -> Result<Vec<(i64, String)>, AppError> {
        let rows = sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM clients ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Client>, AppError> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?");
        let row = sqlx::query_as::<_, Client>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn get(&self, id: i64) -> Result<Client, AppError> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Cliente {id} não encontrado")))
    }

    pub async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Client>, AppError> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE tax_id = ?");
        let row = sqlx::query_as::<_, Client>(&sql)
            .bind(tax_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn details(&self, id: i64) -> Result<ClientDetails, AppError> {
        let client = self.get(id).await?;
        let properties = sqlx::query_as::<_, Property>(
            r#"SELECT id, client_id, name, hectares, municipality, state, coordinates
               FROM properties WHERE client_id = ? ORDER BY name, id"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        let consultations = sqlx::query_as::<_, Consultation>(
            r#"SELECT id, client_id, property_id, consulted_on, kind, notes, outcome
               FROM consultations WHERE client_id = ? ORDER BY consulted_on DESC, id DESC"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        let analyses = sqlx::query_as::<_, SoilAnalysis>(
            r#"SELECT a.id, a.property_id, a.sampled_on, a.ph, a.organic_matter, a.phosphorus,
                      a.potassium, a.calcium, a.magnesium, a.lime_recommendation,
                      a.fertilizer_recommendation
               FROM soil_analyses a
               JOIN properties p ON p.id = a.property_id
               WHERE p.client_id = ?
               ORDER BY a.sampled_on DESC, a.id DESC"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ClientDetails {
            client,
            properties,
            consultations,
            analyses,
        })
    }

    pub async fn create(&self, input: ClientInput) -> Result<SaveOutcome, AppError> {
        let res = sqlx::query(
            r#"INSERT INTO clients (
                name, email, phone, tax_id, address, city, state, notes, active
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.tax_id)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.notes)
        .bind(input.active)
        .execute(&self.pool)
        .await;

        match res {
            Ok(done) => {
                let id = NewRecordId::from_rowid(done.last_insert_rowid());
                info!(id = ?id.get(), name = %input.name, "client created");
                Ok(SaveOutcome::Created(id))
            }
            Err(e) if is_unique_violation(&e) => Ok(duplicate_tax_id()),
            Err(e) => Err(e.into()),
        }
    }

    /// Full overwrite of every editable column.
    pub async fn update(&self, id: i64, input: ClientInput) -> Result<SaveOutcome, AppError> {
        let res = sqlx::query(
            r#"UPDATE clients SET
                name = ?,
                email = ?,
                phone = ?,
                tax_id = ?,
                address = ?,
                city = ?,
                state = ?,
                notes = ?,
                active = ?
              WHERE id = ?"#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.tax_id)
        .bind(&input.address)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.notes)
        .bind(input.active)
        .bind(id)
        .execute(&self.pool)
        .await;

        match res {
            Ok(done) if done.rows_affected() == 0 => {
                Err(AppError::NotFound(format!("Cliente {id} não encontrado")))
            }
            Ok(_) => {
                info!(id, "client updated");
                Ok(SaveOutcome::Updated)
            }
            Err(e) if is_unique_violation(&e) => Ok(duplicate_tax_id()),
            Err(e) => Err(e.into()),
        }
    }

    /// Refuses while properties or consultations still reference the client.
    pub async fn delete(&self, id: i64) -> Result<Notification, AppError> {
        let client = self.get(id).await?;

        let (properties, consultations): (i64, i64) = sqlx::query_as(
            r#"SELECT
                (SELECT COUNT(*) FROM properties WHERE client_id = ?),
                (SELECT COUNT(*) FROM consultations WHERE client_id = ?)"#,
        )
        .bind(id)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if properties > 0 {
            debug!(id, properties, "client delete refused");
            return Ok(Notification::error(format!(
                "Não é possível excluir {}: existem {} propriedade(s) vinculada(s)",
                client.name, properties
            )));
        }
        if consultations > 0 {
            debug!(id, consultations, "client delete refused");
            return Ok(Notification::error(format!(
                "Não é possível excluir {}: existem {} consulta(s) vinculada(s)",
                client.name, consultations
            )));
        }

        sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        info!(id, "client deleted");
        Ok(Notification::success(format!(
            "Cliente {} excluído com sucesso",
            client.name
        )))
    }
}

pub(crate) fn is_unique_violation(e: &SqlxError) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn duplicate_tax_id() -> SaveOutcome {
    SaveOutcome::Rejected(Notification::error("Já existe um cliente com este CPF/CNPJ"))
}
