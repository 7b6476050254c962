//! SIAP office workflow server executable
//!
//! Wires the storage handle, stores, and services together once at startup
//! and serves the gRPC surface.

mod convert;
mod grpc_service;

use clap::{Arg, Command};
use grpc_service::OfficeGrpc;
use siap_core::types::{Role, UpsertUser};
use siap_core::{
    AgendaService, AgendaStore, AuditLogStore, DispositionStore, DispositionWorkflow,
    DocumentService, DocumentStore, HttpNotifier, NotificationStore, Notifier, SiapConfig,
    Storage, UserStore,
};
use siap_grpc::{
    AgendaServiceServer, AuthServiceServer, DashboardServiceServer, DispositionServiceServer,
    DocumentServiceServer, HealthServer, NotificationServiceServer,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with INFO as default if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("siap-server")
        .version("1.0.0")
        .about("Protocol agenda and disposition workflow server")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("/app/config/credentials.json"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .help("Data directory, overriding the configured storage root"),
        )
        .arg(
            Arg::new("grpc-port")
                .long("grpc-port")
                .value_name("PORT")
                .help("gRPC server port")
                .default_value("50051"),
        )
        .arg(
            Arg::new("bootstrap-admin")
                .long("bootstrap-admin")
                .value_name("OPEN_ID")
                .help("Upsert an admin user with this open id before serving"),
        )
        .get_matches();

    // Load configuration
    let config_path = matches.get_one::<String>("config").unwrap();
    let config = SiapConfig::from_file(config_path)?;
    log::info!("Loaded configuration from {}", config_path);

    // Open storage once and inject it everywhere
    let data_root = matches
        .get_one::<String>("data-dir")
        .cloned()
        .unwrap_or_else(|| config.storage.data_root.clone());
    let storage = Arc::new(Storage::open(&data_root)?);
    log::info!("Using data directory: {}", data_root);

    let users = UserStore::new(storage.clone());
    let agenda_store = AgendaStore::new(storage.clone());
    let disposition_store = DispositionStore::new(storage.clone());
    let document_store = DocumentStore::new(storage.clone());
    let notification_store = NotificationStore::new(storage.clone());
    let audit = AuditLogStore::new(storage);

    if let Some(open_id) = matches.get_one::<String>("bootstrap-admin") {
        let user = users.upsert(UpsertUser {
            open_id: open_id.clone(),
            role: Some(Role::Admin),
            ..Default::default()
        })?;
        log::info!("Bootstrapped admin user {} for open id '{}'", user.id, open_id);
    }

    if config.notifier.is_configured() {
        log::info!("Notification gateway: {}", config.notifier.base_url);
    } else {
        log::warn!("Notification gateway not configured; owner alerts will fail and email is skipped");
    }
    let notifier: Arc<dyn Notifier> = Arc::new(HttpNotifier::new(config.notifier.clone()));

    let agenda_service = Arc::new(AgendaService::new(
        agenda_store.clone(),
        users.clone(),
        notification_store.clone(),
        audit.clone(),
        notifier.clone(),
    ));
    let document_service = Arc::new(DocumentService::new(
        document_store.clone(),
        disposition_store.clone(),
        notification_store.clone(),
        audit.clone(),
    ));
    let workflow = Arc::new(DispositionWorkflow::new(
        disposition_store.clone(),
        users.clone(),
        notification_store.clone(),
        audit,
        notifier,
    ));

    let grpc = OfficeGrpc::new(
        users,
        agenda_store,
        disposition_store,
        document_store,
        notification_store,
        agenda_service,
        document_service,
        workflow,
    );

    let port: u16 = matches
        .get_one::<String>("grpc-port")
        .unwrap()
        .parse()
        .expect("Invalid port number");
    let addr = format!("0.0.0.0:{}", port).parse()?;

    log::info!("Starting gRPC server on port {}", port);

    tonic::transport::Server::builder()
        .add_service(AgendaServiceServer::new(grpc.clone()))
        .add_service(DispositionServiceServer::new(grpc.clone()))
        .add_service(DocumentServiceServer::new(grpc.clone()))
        .add_service(NotificationServiceServer::new(grpc.clone()))
        .add_service(DashboardServiceServer::new(grpc.clone()))
        .add_service(AuthServiceServer::new(grpc.clone()))
        .add_service(HealthServer::new(grpc))
        .serve(addr)
        .await?;

    Ok(())
}
