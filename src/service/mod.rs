pub mod clients;
pub mod listing;
pub mod outcome;
pub mod properties;
pub mod validation;

pub use clients::{ClientDetails, ClientStore};
pub use listing::{ListParams, ListQuery, Page};
pub use outcome::{NewRecordId, Notification, NotificationKind, SaveOutcome, SaveTarget};
pub use properties::PropertyStore;
