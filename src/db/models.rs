use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub registered_at: NaiveDateTime,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Property {
    pub id: i64,
    pub client_id: i64,
    pub name: String,
    pub hectares: Option<f64>,
    pub municipality: Option<String>,
    pub state: Option<String>,
    pub coordinates: Option<String>,
}

/// Property row joined with its owner's name, for listings.
#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct PropertyRow {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub name: String,
    pub hectares: Option<f64>,
    pub municipality: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Consultation {
    pub id: i64,
    pub client_id: i64,
    pub property_id: Option<i64>,
    pub consulted_on: NaiveDate,
    pub kind: Option<String>,
    pub notes: Option<String>,
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct SoilAnalysis {
    pub id: i64,
    pub property_id: i64,
    pub sampled_on: Option<NaiveDate>,
    pub ph: Option<f64>,
    pub organic_matter: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub calcium: Option<f64>,
    pub magnesium: Option<f64>,
    pub lime_recommendation: Option<String>,
    pub fertilizer_recommendation: Option<String>,
}

/// Raw client form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub cpf_cnpj: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    /// Checkbox: present (any value) means active.
    #[serde(default)]
    pub ativo: Option<String>,
}

/// Validated column values for a full client write.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
}

/// Raw property form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub cliente_id: Option<String>,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub hectares: Option<String>,
    #[serde(default)]
    pub municipio: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub coordenadas: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInput {
    pub client_id: i64,
    pub name: String,
    pub hectares: Option<f64>,
    pub municipality: Option<String>,
    pub state: Option<String>,
    pub coordinates: Option<String>,
}
