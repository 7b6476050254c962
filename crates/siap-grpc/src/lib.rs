//! Generated gRPC code for the SIAP office services

// Re-export all generated code
pub mod siap {
    pub mod office {
        pub mod v1 {
            // Include the generated proto code
            tonic::include_proto!("siap.office.v1");
        }
    }
}

// Convenience re-exports
pub use siap::office::v1::*;

// Re-export service traits
pub use siap::office::v1::agenda_service_server::{AgendaService, AgendaServiceServer};
pub use siap::office::v1::disposition_service_server::{DispositionService, DispositionServiceServer};
pub use siap::office::v1::document_service_server::{DocumentService, DocumentServiceServer};
pub use siap::office::v1::notification_service_server::{NotificationService, NotificationServiceServer};
pub use siap::office::v1::dashboard_service_server::{DashboardService, DashboardServiceServer};
pub use siap::office::v1::auth_service_server::{AuthService, AuthServiceServer};
pub use siap::office::v1::health_server::{Health, HealthServer};

// Re-export client types
pub use siap::office::v1::agenda_service_client::AgendaServiceClient;
pub use siap::office::v1::disposition_service_client::DispositionServiceClient;
pub use siap::office::v1::document_service_client::DocumentServiceClient;
pub use siap::office::v1::notification_service_client::NotificationServiceClient;
pub use siap::office::v1::dashboard_service_client::DashboardServiceClient;
pub use siap::office::v1::auth_service_client::AuthServiceClient;
pub use siap::office::v1::health_client::HealthClient;
