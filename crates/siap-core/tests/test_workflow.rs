//! End-to-end workflow scenarios wiring real stores against a recorded
//! notification channel

use async_trait::async_trait;
use chrono::Utc;
use siap_core::audit::{AuditAction, EntityType};
use siap_core::store::Storage;
use siap_core::types::{
    Actor, AgendaId, Capability, DispositionStatus, EventType, NewAgenda, NewDisposition,
    NotificationType, Priority, Role, UpsertUser, UserId,
};
use siap_core::{
    AgendaService, AgendaStore, AuditLogStore, Delivery, DispositionStore, DispositionWorkflow,
    DocumentStore, NotificationStore, Notifier, SiapError, UserStore,
};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

struct RecordingNotifier {
    owner_alerts: Mutex<Vec<String>>,
    emails: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            owner_alerts: Mutex::new(Vec::new()),
            emails: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_owner(&self, title: &str, _content: &str) -> siap_core::Result<Delivery> {
        self.owner_alerts.lock().unwrap().push(title.to_string());
        Ok(Delivery::Delivered)
    }

    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        _html: &str,
    ) -> siap_core::Result<Delivery> {
        self.emails
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        Ok(Delivery::Delivered)
    }
}

struct System {
    _guard: TempDir,
    users: UserStore,
    agendas: AgendaService,
    agenda_store: AgendaStore,
    workflow: DispositionWorkflow,
    notifications: NotificationStore,
    audit: AuditLogStore,
    notifier: Arc<RecordingNotifier>,
}

fn system() -> System {
    let guard = TempDir::new().unwrap();
    let storage = Arc::new(Storage::open(guard.path()).unwrap());
    let users = UserStore::new(storage.clone());
    let agenda_store = AgendaStore::new(storage.clone());
    let dispositions = DispositionStore::new(storage.clone());
    let _documents = DocumentStore::new(storage.clone());
    let notifications = NotificationStore::new(storage.clone());
    let audit = AuditLogStore::new(storage);
    let notifier = Arc::new(RecordingNotifier::new());

    let agendas = AgendaService::new(
        agenda_store.clone(),
        users.clone(),
        notifications.clone(),
        audit.clone(),
        notifier.clone(),
    );
    let workflow = DispositionWorkflow::new(
        dispositions,
        users.clone(),
        notifications.clone(),
        audit.clone(),
        notifier.clone(),
    );

    System {
        _guard: guard,
        users,
        agendas,
        agenda_store,
        workflow,
        notifications,
        audit,
        notifier,
    }
}

fn admin_actor(system: &System) -> Actor {
    let user = system
        .users
        .upsert(UpsertUser {
            open_id: "admin".to_string(),
            name: Some("Kepala Bagian".to_string()),
            email: Some("kabag@example.go.id".to_string()),
            role: Some(Role::Admin),
            ..Default::default()
        })
        .unwrap();
    let actor = Actor::for_user(&user);
    assert!(actor.has(Capability::Approve));
    actor
}

#[tokio::test]
async fn test_full_approval_scenario() {
    let system = system();
    let admin = admin_actor(&system);
    let start = Utc::now();

    // An agenda backs the disposition
    let agenda = system
        .agendas
        .create(
            NewAgenda {
                title: "Kunjungan Gubernur".to_string(),
                description: Some("Kunjungan kerja".to_string()),
                event_date: start,
                event_location: Some("Balai Kota".to_string()),
                event_type: EventType::Ceremony,
                organizer: "Bagian Protokol".to_string(),
                attendees: vec!["Sekda".to_string()],
                notes: None,
            },
            &admin,
            None,
        )
        .await
        .unwrap();

    // New disposition starts pending
    let disposition = system
        .workflow
        .create(
            NewDisposition {
                agenda_id: agenda.id,
                document_title: "Surat Permohonan Pengamanan".to_string(),
                document_number: Some("121/PROT/2026".to_string()),
                description: None,
                priority: Priority::Urgent,
                assigned_to: Some(admin.id),
                approval_required: true,
                due_date: None,
            },
            &admin,
            None,
        )
        .await
        .unwrap();
    assert_eq!(disposition.status, DispositionStatus::Pending);

    // Approve it
    let outcome = system
        .workflow
        .transition_status(
            disposition.id,
            DispositionStatus::Approved,
            Some("ok".to_string()),
            &admin,
            None,
        )
        .await
        .unwrap();

    let approved = &outcome.disposition;
    assert_eq!(approved.status, DispositionStatus::Approved);
    assert_eq!(approved.approved_by, Some(admin.id));
    assert!(approved.approval_date.unwrap() >= start);

    // Exactly one update_status audit row for this disposition
    let entries = system
        .audit
        .list_for(EntityType::Disposition, disposition.id.value(), 100)
        .unwrap();
    let status_entries: Vec<_> = entries
        .iter()
        .filter(|e| e.action == AuditAction::UpdateStatus)
        .collect();
    assert_eq!(status_entries.len(), 1);
    assert_eq!(status_entries[0].entity_id, disposition.id.value());

    // Side effects landed: approval-needed email on create, approved row after
    let emails = system.notifier.emails.lock().unwrap().clone();
    assert!(emails.iter().any(|(to, _)| to == "kabag@example.go.id"));

    let inbox = system
        .notifications
        .list_for_user(admin.id, 50, 0)
        .unwrap();
    assert!(inbox
        .iter()
        .any(|n| n.kind == NotificationType::DispositionApproved));
}

#[tokio::test]
async fn test_reject_requires_admin_capability() {
    let system = system();
    let admin = admin_actor(&system);

    let staff = system
        .users
        .upsert(UpsertUser {
            open_id: "staff".to_string(),
            role: Some(Role::User),
            ..Default::default()
        })
        .unwrap();
    let staff_actor = Actor::for_user(&staff);

    let disposition = system
        .workflow
        .create(
            NewDisposition {
                agenda_id: AgendaId::new(1),
                document_title: "Surat".to_string(),
                document_number: None,
                description: None,
                priority: Priority::Medium,
                assigned_to: None,
                approval_required: false,
                due_date: None,
            },
            &admin,
            None,
        )
        .await
        .unwrap();

    let denied = system
        .workflow
        .transition_status(
            disposition.id,
            DispositionStatus::Rejected,
            None,
            &staff_actor,
            None,
        )
        .await;
    assert!(matches!(denied, Err(SiapError::Auth(_))));

    // Moving to review stays open to everyone
    let reviewed = system
        .workflow
        .transition_status(
            disposition.id,
            DispositionStatus::InReview,
            None,
            &staff_actor,
            None,
        )
        .await
        .unwrap();
    assert_eq!(reviewed.disposition.status, DispositionStatus::InReview);
}

#[tokio::test]
async fn test_listing_empty_system_is_empty_not_error() {
    let system = system();
    assert!(system.agenda_store.list(50, 0).unwrap().is_empty());
    assert!(system
        .notifications
        .list_for_user(UserId::new(1), 50, 0)
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_delete_missing_agenda_is_not_found() {
    let system = system();
    let admin = admin_actor(&system);

    let result = system.agendas.delete(AgendaId::new(500), &admin, None).await;
    assert!(matches!(result, Err(SiapError::NotFound(_))));

    // And no audit entry was produced for the missing id
    let entries = system.audit.list_for(EntityType::Agenda, 500, 10).unwrap();
    assert!(entries.is_empty());
}
