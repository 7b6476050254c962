//! Entity stores backed by the shared file storage

pub mod agendas;
pub mod dispositions;
pub mod documents;
pub mod notifications;
pub mod storage;
pub mod users;

// Re-export all store types
pub use agendas::AgendaStore;
pub use dispositions::DispositionStore;
pub use documents::DocumentStore;
pub use notifications::NotificationStore;
pub use storage::{Storage, Table};
pub use users::UserStore;
