//! Form validation: raw browser forms into column values or a refusal toast.

use crate::db::models::{ClientForm, ClientInput, PropertyForm, PropertyInput};
use crate::service::outcome::Notification;

/// Trim, and treat blank as absent.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn validate_client(form: ClientForm) -> Result<ClientInput, Notification> {
    let name = form.nome.trim().to_string();
    if name.is_empty() {
        return Err(Notification::error("O nome do cliente é obrigatório"));
    }
    let email = clean(form.email);
    if let Some(email) = email.as_deref()
        && !email.contains('@')
    {
        return Err(Notification::error("E-mail inválido"));
    }

    Ok(ClientInput {
        name,
        email,
        phone: clean(form.telefone),
        tax_id: clean(form.cpf_cnpj),
        address: clean(form.endereco),
        city: clean(form.cidade),
        state: clean(form.estado),
        notes: clean(form.observacoes),
        active: form.ativo.is_some(),
    })
}

pub fn validate_property(form: PropertyForm) -> Result<PropertyInput, Notification> {
    let client_id = form
        .cliente_id
        .as_deref()
        .map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| Notification::error("Selecione o cliente proprietário"))?;

    let name = form.nome.trim().to_string();
    if name.is_empty() {
        return Err(Notification::error("O nome da propriedade é obrigatório"));
    }

    let hectares = match clean(form.hectares) {
        None => None,
        Some(raw) => Some(
            parse_decimal(&raw)
                .filter(|h| *h >= 0.0)
                .ok_or_else(|| Notification::error("Área em hectares inválida"))?,
        ),
    };

    Ok(PropertyInput {
        client_id,
        name,
        hectares,
        municipality: clean(form.municipio),
        state: clean(form.estado),
        coordinates: clean(form.coordenadas),
    })
}

/// Accepts `12.5`, `12,5` and `1.234,5`.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let normalized = if raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.to_string()
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
