//! Conversions between core domain types and the generated proto types
//!
//! Inbound enum values are decoded strictly: unspecified or unknown numbers
//! are rejected with INVALID_ARGUMENT before they reach the workflow core.

use chrono::{DateTime, Utc};
use siap_core::types::{
    Agenda, AgendaStatus, Disposition, DispositionStatus, Document, DocumentType, EventType,
    Notification, NotificationType, Priority, Role, User,
};
use siap_grpc as pb;
use tonic::Status;

pub fn to_proto_timestamp(dt: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

pub fn from_proto_timestamp(ts: &prost_types::Timestamp) -> Result<DateTime<Utc>, Status> {
    DateTime::from_timestamp(ts.seconds, ts.nanos.max(0) as u32)
        .ok_or_else(|| Status::invalid_argument("Timestamp out of range"))
}

// ===== Enums: core -> proto =====

pub fn role_to_proto(role: Role) -> pb::UserRole {
    match role {
        Role::User => pb::UserRole::User,
        Role::Admin => pb::UserRole::Admin,
    }
}

pub fn event_type_to_proto(value: EventType) -> pb::EventType {
    match value {
        EventType::Meeting => pb::EventType::Meeting,
        EventType::Ceremony => pb::EventType::Ceremony,
        EventType::Conference => pb::EventType::Conference,
        EventType::Workshop => pb::EventType::Workshop,
        EventType::Other => pb::EventType::Other,
    }
}

pub fn agenda_status_to_proto(value: AgendaStatus) -> pb::AgendaStatus {
    match value {
        AgendaStatus::Draft => pb::AgendaStatus::Draft,
        AgendaStatus::Scheduled => pb::AgendaStatus::Scheduled,
        AgendaStatus::Ongoing => pb::AgendaStatus::Ongoing,
        AgendaStatus::Completed => pb::AgendaStatus::Completed,
        AgendaStatus::Cancelled => pb::AgendaStatus::Cancelled,
    }
}

pub fn priority_to_proto(value: Priority) -> pb::Priority {
    match value {
        Priority::Low => pb::Priority::Low,
        Priority::Medium => pb::Priority::Medium,
        Priority::High => pb::Priority::High,
        Priority::Urgent => pb::Priority::Urgent,
    }
}

pub fn disposition_status_to_proto(value: DispositionStatus) -> pb::DispositionStatus {
    match value {
        DispositionStatus::Pending => pb::DispositionStatus::Pending,
        DispositionStatus::InReview => pb::DispositionStatus::InReview,
        DispositionStatus::Approved => pb::DispositionStatus::Approved,
        DispositionStatus::Rejected => pb::DispositionStatus::Rejected,
        DispositionStatus::Completed => pb::DispositionStatus::Completed,
    }
}

pub fn document_type_to_proto(value: DocumentType) -> pb::DocumentType {
    match value {
        DocumentType::Invitation => pb::DocumentType::Invitation,
        DocumentType::Minutes => pb::DocumentType::Minutes,
        DocumentType::Photo => pb::DocumentType::Photo,
        DocumentType::Report => pb::DocumentType::Report,
        DocumentType::Other => pb::DocumentType::Other,
    }
}

pub fn notification_type_to_proto(value: NotificationType) -> pb::NotificationType {
    match value {
        NotificationType::AgendaCreated => pb::NotificationType::AgendaCreated,
        NotificationType::AgendaUpdated => pb::NotificationType::AgendaUpdated,
        NotificationType::DispositionAssigned => pb::NotificationType::DispositionAssigned,
        NotificationType::DispositionApprovalNeeded => {
            pb::NotificationType::DispositionApprovalNeeded
        }
        NotificationType::DispositionApproved => pb::NotificationType::DispositionApproved,
        NotificationType::DispositionRejected => pb::NotificationType::DispositionRejected,
        NotificationType::DocumentUploaded => pb::NotificationType::DocumentUploaded,
        NotificationType::SystemAlert => pb::NotificationType::SystemAlert,
    }
}

// ===== Enums: proto -> core =====

pub fn event_type_from_proto(value: i32) -> Result<EventType, Status> {
    match pb::EventType::try_from(value) {
        Ok(pb::EventType::Meeting) => Ok(EventType::Meeting),
        Ok(pb::EventType::Ceremony) => Ok(EventType::Ceremony),
        Ok(pb::EventType::Conference) => Ok(EventType::Conference),
        Ok(pb::EventType::Workshop) => Ok(EventType::Workshop),
        Ok(pb::EventType::Other) => Ok(EventType::Other),
        Ok(pb::EventType::Unspecified) | Err(_) => {
            Err(Status::invalid_argument("Invalid event type"))
        }
    }
}

pub fn agenda_status_from_proto(value: i32) -> Result<AgendaStatus, Status> {
    match pb::AgendaStatus::try_from(value) {
        Ok(pb::AgendaStatus::Draft) => Ok(AgendaStatus::Draft),
        Ok(pb::AgendaStatus::Scheduled) => Ok(AgendaStatus::Scheduled),
        Ok(pb::AgendaStatus::Ongoing) => Ok(AgendaStatus::Ongoing),
        Ok(pb::AgendaStatus::Completed) => Ok(AgendaStatus::Completed),
        Ok(pb::AgendaStatus::Cancelled) => Ok(AgendaStatus::Cancelled),
        Ok(pb::AgendaStatus::Unspecified) | Err(_) => {
            Err(Status::invalid_argument("Invalid agenda status"))
        }
    }
}

pub fn priority_from_proto(value: i32) -> Result<Priority, Status> {
    match pb::Priority::try_from(value) {
        Ok(pb::Priority::Low) => Ok(Priority::Low),
        Ok(pb::Priority::Medium) => Ok(Priority::Medium),
        Ok(pb::Priority::High) => Ok(Priority::High),
        Ok(pb::Priority::Urgent) => Ok(Priority::Urgent),
        Ok(pb::Priority::Unspecified) | Err(_) => {
            Err(Status::invalid_argument("Invalid priority"))
        }
    }
}

pub fn disposition_status_from_proto(value: i32) -> Result<DispositionStatus, Status> {
    match pb::DispositionStatus::try_from(value) {
        Ok(pb::DispositionStatus::Pending) => Ok(DispositionStatus::Pending),
        Ok(pb::DispositionStatus::InReview) => Ok(DispositionStatus::InReview),
        Ok(pb::DispositionStatus::Approved) => Ok(DispositionStatus::Approved),
        Ok(pb::DispositionStatus::Rejected) => Ok(DispositionStatus::Rejected),
        Ok(pb::DispositionStatus::Completed) => Ok(DispositionStatus::Completed),
        Ok(pb::DispositionStatus::Unspecified) | Err(_) => {
            Err(Status::invalid_argument("Invalid disposition status"))
        }
    }
}

pub fn document_type_from_proto(value: i32) -> Result<DocumentType, Status> {
    match pb::DocumentType::try_from(value) {
        Ok(pb::DocumentType::Invitation) => Ok(DocumentType::Invitation),
        Ok(pb::DocumentType::Minutes) => Ok(DocumentType::Minutes),
        Ok(pb::DocumentType::Photo) => Ok(DocumentType::Photo),
        Ok(pb::DocumentType::Report) => Ok(DocumentType::Report),
        Ok(pb::DocumentType::Other) => Ok(DocumentType::Other),
        Ok(pb::DocumentType::Unspecified) | Err(_) => {
            Err(Status::invalid_argument("Invalid document type"))
        }
    }
}

// ===== Records: core -> proto =====

pub fn user_to_proto(user: User) -> pb::User {
    pb::User {
        id: user.id.value(),
        open_id: user.open_id,
        name: user.name,
        email: user.email,
        role: role_to_proto(user.role) as i32,
        department: user.department,
        position: user.position,
        phone: user.phone,
        created_at: Some(to_proto_timestamp(user.created_at)),
        last_signed_in: Some(to_proto_timestamp(user.last_signed_in)),
    }
}

pub fn agenda_to_proto(agenda: Agenda) -> pb::Agenda {
    pb::Agenda {
        id: agenda.id.value(),
        title: agenda.title,
        description: agenda.description,
        event_date: Some(to_proto_timestamp(agenda.event_date)),
        event_location: agenda.event_location,
        event_type: event_type_to_proto(agenda.event_type) as i32,
        status: agenda_status_to_proto(agenda.status) as i32,
        organizer: agenda.organizer,
        attendees: agenda.attendees,
        notes: agenda.notes,
        created_by: agenda.created_by.value(),
        updated_by: agenda.updated_by.map(|u| u.value()),
        created_at: Some(to_proto_timestamp(agenda.created_at)),
        updated_at: Some(to_proto_timestamp(agenda.updated_at)),
    }
}

pub fn disposition_to_proto(disposition: Disposition) -> pb::Disposition {
    pb::Disposition {
        id: disposition.id.value(),
        agenda_id: disposition.agenda_id.value(),
        document_title: disposition.document_title,
        document_number: disposition.document_number,
        description: disposition.description,
        priority: priority_to_proto(disposition.priority) as i32,
        status: disposition_status_to_proto(disposition.status) as i32,
        assigned_to: disposition.assigned_to.map(|u| u.value()),
        approval_required: disposition.approval_required,
        approved_by: disposition.approved_by.map(|u| u.value()),
        approval_date: disposition.approval_date.map(to_proto_timestamp),
        approval_notes: disposition.approval_notes,
        due_date: disposition.due_date.map(to_proto_timestamp),
        completion_date: disposition.completion_date.map(to_proto_timestamp),
        created_by: disposition.created_by.value(),
        created_at: Some(to_proto_timestamp(disposition.created_at)),
        updated_at: Some(to_proto_timestamp(disposition.updated_at)),
    }
}

pub fn document_to_proto(document: Document) -> pb::Document {
    pb::Document {
        id: document.id.value(),
        agenda_id: document.agenda_id.map(|a| a.value()),
        disposition_id: document.disposition_id.map(|d| d.value()),
        file_name: document.file_name,
        file_key: document.file_key,
        file_url: document.file_url,
        file_type: document.file_type,
        file_size: document.file_size,
        document_type: document_type_to_proto(document.document_type) as i32,
        uploaded_by: document.uploaded_by.value(),
        created_at: Some(to_proto_timestamp(document.created_at)),
        updated_at: Some(to_proto_timestamp(document.updated_at)),
    }
}

pub fn notification_to_proto(notification: Notification) -> pb::Notification {
    pb::Notification {
        id: notification.id.value(),
        user_id: notification.user_id.value(),
        r#type: notification_type_to_proto(notification.kind) as i32,
        title: notification.title,
        message: notification.message,
        related_agenda_id: notification.related_agenda_id.map(|a| a.value()),
        related_disposition_id: notification.related_disposition_id.map(|d| d.value()),
        is_read: notification.is_read,
        read_at: notification.read_at.map(to_proto_timestamp),
        email_sent: notification.email_sent,
        email_sent_at: notification.email_sent_at.map(to_proto_timestamp),
        created_at: Some(to_proto_timestamp(notification.created_at)),
    }
}
