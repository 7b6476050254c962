//! Outbound notification channels and email rendering

pub mod dispatcher;
pub mod templates;

pub use dispatcher::{
    validate_payload, Delivery, HttpNotifier, Notifier, CONTENT_MAX_LENGTH, TITLE_MAX_LENGTH,
};
pub use templates::{escape_html, render_agenda_email, render_disposition_email};
