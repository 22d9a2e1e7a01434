//! SQL DDL for the record-keeping database.
//! Every statement is idempotent so it can run on each startup.

/// SQLite schema:
/// - `clients.tax_id` UNIQUE (CPF/CNPJ; several NULLs allowed)
/// - children reference parents without `ON DELETE CASCADE`; deletes are
///   guarded in the stores and foreign keys are enforced per connection
/// - booleans stored as INTEGER 0/1, timestamps as `YYYY-MM-DD HH:MM:SS` text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS clients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NULL,
    phone TEXT NULL,
    tax_id TEXT NULL UNIQUE,
    registered_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    address TEXT NULL,
    city TEXT NULL,
    state TEXT NULL,
    notes TEXT NULL,
    active INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS properties (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL REFERENCES clients(id),
    name TEXT NOT NULL,
    hectares REAL NULL,
    municipality TEXT NULL,
    state TEXT NULL,
    coordinates TEXT NULL
);

CREATE INDEX IF NOT EXISTS idx_properties_client_id ON properties(client_id);

CREATE TABLE IF NOT EXISTS consultations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL REFERENCES clients(id),
    property_id INTEGER NULL REFERENCES properties(id),
    consulted_on TEXT NOT NULL,
    kind TEXT NULL,
    notes TEXT NULL,
    outcome TEXT NULL
);

CREATE INDEX IF NOT EXISTS idx_consultations_client_id ON consultations(client_id);
CREATE INDEX IF NOT EXISTS idx_consultations_property_id ON consultations(property_id);

CREATE TABLE IF NOT EXISTS soil_analyses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    property_id INTEGER NOT NULL REFERENCES properties(id),
    sampled_on TEXT NULL,
    ph REAL NULL,
    organic_matter REAL NULL,
    phosphorus REAL NULL,
    potassium REAL NULL,
    calcium REAL NULL,
    magnesium REAL NULL,
    lime_recommendation TEXT NULL,
    fertilizer_recommendation TEXT NULL
);

CREATE INDEX IF NOT EXISTS idx_soil_analyses_property_id ON soil_analyses(property_id);
"#;

/// Tables in creation order, parents first.
pub const TABLES: [&str; 4] = ["clients", "properties", "consultations", "soil_analyses"];
