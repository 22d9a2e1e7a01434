//! One data struct per rendered view. Each names its full-page template and
//! the fragment served to in-page (`HX-Request`) refreshes.

use crate::config::AppEnv;
use crate::db::{Client, Consultation, Property, PropertyRow, SoilAnalysis};
use crate::service::{ClientDetails, Page};
use chrono::Datelike;
use serde::Serialize;

pub trait View: Serialize {
    const PAGE: &'static str;
    const FRAGMENT: &'static str;
}

/// Fields every page shares.
#[derive(Debug, Clone, Serialize)]
pub struct PageBase {
    pub env: &'static str,
    pub is_development: bool,
    pub current_path: String,
    pub year: i32,
}

impl PageBase {
    pub fn new(env: AppEnv, current_path: impl Into<String>) -> Self {
        Self {
            env: env.as_str(),
            is_development: env.is_development(),
            current_path: current_path.into(),
            year: chrono::Local::now().year(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityCounts {
    pub clients: i64,
    pub properties: i64,
    pub consultations: i64,
    pub analyses: i64,
}

impl From<[i64; 4]> for EntityCounts {
    fn from([clients, properties, consultations, analyses]: [i64; 4]) -> Self {
        Self {
            clients,
            properties,
            consultations,
            analyses,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub base: PageBase,
    pub counts: EntityCounts,
    pub recent_clients: Vec<Client>,
}

impl View for DashboardView {
    const PAGE: &'static str = "index.html";
    const FRAGMENT: &'static str = "partials/dashboard.html";
}

#[derive(Debug, Serialize)]
pub struct ClientListView {
    pub base: PageBase,
    pub page: Page<Client>,
}

impl View for ClientListView {
    const PAGE: &'static str = "clients/list.html";
    const FRAGMENT: &'static str = "clients/_table.html";
}

#[derive(Debug, Serialize)]
pub struct ClientFormView {
    pub base: PageBase,
    pub client: Option<Client>,
    pub editing: bool,
}

impl View for ClientFormView {
    const PAGE: &'static str = "clients/form.html";
    const FRAGMENT: &'static str = "clients/_form.html";
}

#[derive(Debug, Serialize)]
pub struct ClientDetailsView {
    pub base: PageBase,
    pub client: Client,
    pub properties: Vec<Property>,
    pub consultations: Vec<Consultation>,
    pub analyses: Vec<SoilAnalysis>,
    pub total_hectares: f64,
}

impl ClientDetailsView {
    pub fn new(base: PageBase, details: ClientDetails) -> Self {
        let total_hectares = details.properties.iter().filter_map(|p| p.hectares).sum();
        Self {
            base,
            client: details.client,
            properties: details.properties,
            consultations: details.consultations,
            analyses: details.analyses,
            total_hectares,
        }
    }
}

impl View for ClientDetailsView {
    const PAGE: &'static str = "clients/details.html";
    const FRAGMENT: &'static str = "clients/_details.html";
}

#[derive(Debug, Serialize)]
pub struct PropertyListView {
    pub base: PageBase,
    pub page: Page<PropertyRow>,
}

impl View for PropertyListView {
    const PAGE: &'static str = "properties/list.html";
    const FRAGMENT: &'static str = "properties/_table.html";
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientOption {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PropertyFormView {
    pub base: PageBase,
    pub property: Option<Property>,
    pub clients: Vec<ClientOption>,
    pub selected_client: Option<i64>,
    pub editing: bool,
}

impl View for PropertyFormView {
    const PAGE: &'static str = "properties/form.html";
    const FRAGMENT: &'static str = "properties/_form.html";
}
