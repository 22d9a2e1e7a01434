use serde::Serialize;

/// Classification carried to the browser so it can pick the toast style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Result of a business rule, shown to the user as a toast.
/// Refusals are ordinary values here, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

/// Identifier of a freshly inserted row, when the store can report it.
///
/// Callers that need the id right away must handle `Unavailable`, typically by
/// re-querying with a natural key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewRecordId {
    Assigned(i64),
    Unavailable,
}

impl NewRecordId {
    pub fn from_rowid(rowid: i64) -> Self {
        if rowid > 0 {
            NewRecordId::Assigned(rowid)
        } else {
            NewRecordId::Unavailable
        }
    }

    pub fn get(self) -> Option<i64> {
        match self {
            NewRecordId::Assigned(id) => Some(id),
            NewRecordId::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(NewRecordId),
    Updated,
    Rejected(Notification),
}

/// What a save form asked for, decided by its `id` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(i64),
}

impl SaveTarget {
    /// Absent, blank or `0` creates; a positive integer updates; anything else is malformed.
    pub fn from_form_id(raw: Option<&str>) -> Option<Self> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Some(SaveTarget::Create);
        }
        match raw.parse::<i64>() {
            Ok(0) => Some(SaveTarget::Create),
            Ok(id) if id > 0 => Some(SaveTarget::Update(id)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_id_selects_create_or_update() {
        assert_eq!(SaveTarget::from_form_id(None), Some(SaveTarget::Create));
        assert_eq!(SaveTarget::from_form_id(Some("  ")), Some(SaveTarget::Create));
        assert_eq!(SaveTarget::from_form_id(Some("0")), Some(SaveTarget::Create));
        assert_eq!(SaveTarget::from_form_id(Some("42")), Some(SaveTarget::Update(42)));
        assert_eq!(SaveTarget::from_form_id(Some("-1")), None);
        assert_eq!(SaveTarget::from_form_id(Some("abc")), None);
    }

    #[test]
    fn zero_rowid_is_not_an_identifier() {
        assert_eq!(NewRecordId::from_rowid(0), NewRecordId::Unavailable);
        assert_eq!(NewRecordId::from_rowid(7).get(), Some(7));
    }

    #[test]
    fn notification_serializes_kind_as_type() {
        let json = serde_json::to_string(&Notification::error("x")).expect("serialize");
        assert_eq!(json, r#"{"message":"x","type":"error"}"#);
    }
}
