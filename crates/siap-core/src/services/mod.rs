//! Orchestration services wrapping the entity stores

pub mod agendas;
pub mod documents;

pub use agendas::AgendaService;
pub use documents::DocumentService;
