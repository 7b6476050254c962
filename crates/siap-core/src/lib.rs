//! SIAP Core Library
//!
//! Consolidated business logic for the protocol agenda and disposition
//! tracking system: entity stores, the append-only audit trail, the
//! notification dispatcher, and the disposition approval workflow.

pub mod audit;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod notify;
pub mod services;
pub mod store;
pub mod types;
pub mod workflow;

// Re-export main types for easy access
pub use config::SiapConfig;
pub use error::{Result, SiapError};

// Re-export store types
pub use store::{
    AgendaStore, DispositionStore, DocumentStore, NotificationStore, Storage, UserStore,
};

// Re-export audit types
pub use audit::{AuditAction, AuditLog, AuditLogStore, ChangeSet, EntityType};

// Re-export notification types
pub use notify::{Delivery, HttpNotifier, Notifier};

// Re-export service types
pub use services::{AgendaService, DocumentService};

// Re-export workflow types
pub use workflow::{
    DispositionWorkflow, HealthCheckResult, HealthStatus, TransitionOutcome, TransitionPolicy,
};
