//! Common types used throughout the SIAP system
//! Identifiers and status fields are strongly typed - no string-based state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Strongly typed UserId
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed AgendaId
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgendaId(i64);

impl AgendaId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AgendaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed DispositionId
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DispositionId(i64);

impl DispositionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for DispositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed DocumentId
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(i64);

impl DocumentId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed NotificationId
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(i64);

impl NotificationId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed AuditLogId
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AuditLogId(i64);

impl AuditLogId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AuditLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User role as stored on the user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

/// Fine-grained capability derived from the role, checked inside the
/// workflow service rather than only at the request edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Approve,
}

/// The acting user for a mutation, resolved by the request edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub capabilities: BTreeSet<Capability>,
}

impl Actor {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            capabilities: BTreeSet::new(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Derive capabilities from a stored user record
    pub fn for_user(user: &User) -> Self {
        let actor = Self::new(user.id);
        match user.role {
            Role::Admin => actor.with_capability(Capability::Approve),
            Role::User => actor,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Request metadata recorded with audit entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Agenda event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Meeting,
    Ceremony,
    Conference,
    Workshop,
    Other,
}

/// Agenda lifecycle status - transitions are deliberately unrestricted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgendaStatus {
    Draft,
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

/// Disposition priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disposition approval workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispositionStatus {
    Pending,
    InReview,
    Approved,
    Rejected,
    Completed,
}

impl DispositionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InReview => "in_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// All defined statuses, used for health-check counting
    pub fn all() -> [DispositionStatus; 5] {
        [
            Self::Pending,
            Self::InReview,
            Self::Approved,
            Self::Rejected,
            Self::Completed,
        ]
    }
}

impl fmt::Display for DispositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uploaded document category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Invitation,
    Minutes,
    Photo,
    Report,
    Other,
}

/// Domain events a notification row can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    AgendaCreated,
    AgendaUpdated,
    DispositionAssigned,
    DispositionApprovalNeeded,
    DispositionApproved,
    DispositionRejected,
    DocumentUploaded,
    SystemAlert,
}

/// User record backing actor resolution and email delivery.
/// Session issuance itself lives outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: Role,
    pub department: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_signed_in: DateTime<Utc>,
}

/// Fields accepted when upserting a user from the session edge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertUser {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
}

/// A scheduled protocol event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agenda {
    pub id: AgendaId,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub event_location: Option<String>,
    pub event_type: EventType,
    pub status: AgendaStatus,
    pub organizer: String,
    pub attendees: Vec<String>,
    pub notes: Option<String>,
    pub created_by: UserId,
    pub updated_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating an agenda
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAgenda {
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub event_location: Option<String>,
    pub event_type: EventType,
    pub organizer: String,
    pub attendees: Vec<String>,
    pub notes: Option<String>,
}

/// Partial update for an agenda; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgendaPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_location: Option<String>,
    pub event_type: Option<EventType>,
    pub organizer: Option<String>,
    pub attendees: Option<Vec<String>>,
    pub status: Option<AgendaStatus>,
    pub notes: Option<String>,
}

/// A document-routing record tied to an agenda, carrying the approval workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disposition {
    pub id: DispositionId,
    pub agenda_id: AgendaId,
    pub document_title: String,
    pub document_number: Option<String>,
    pub description: Option<String>,
    pub priority: Priority,
    pub status: DispositionStatus,
    pub assigned_to: Option<UserId>,
    pub approval_required: bool,
    pub approved_by: Option<UserId>,
    pub approval_date: Option<DateTime<Utc>>,
    pub approval_notes: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completion_date: Option<DateTime<Utc>>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Disposition {
    /// The user who should hear about status changes
    pub fn notification_recipient(&self) -> UserId {
        self.assigned_to.unwrap_or(self.created_by)
    }
}

/// Fields accepted when creating a disposition; status always starts pending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDisposition {
    pub agenda_id: AgendaId,
    pub document_title: String,
    pub document_number: Option<String>,
    pub description: Option<String>,
    pub priority: Priority,
    pub assigned_to: Option<UserId>,
    pub approval_required: bool,
    pub due_date: Option<DateTime<Utc>>,
}

/// Metadata for a file held in external object storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub agenda_id: Option<AgendaId>,
    pub disposition_id: Option<DispositionId>,
    pub file_name: String,
    pub file_key: String,
    pub file_url: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub document_type: DocumentType,
    pub uploaded_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when registering uploaded-file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub agenda_id: Option<AgendaId>,
    pub disposition_id: Option<DispositionId>,
    pub file_name: String,
    pub file_key: String,
    pub file_url: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub document_type: DocumentType,
}

/// A per-user notification row; mutated only to flip the read/email flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationType,
    pub title: String,
    pub message: Option<String>,
    pub related_agenda_id: Option<AgendaId>,
    pub related_disposition_id: Option<DispositionId>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub email_sent: bool,
    pub email_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when recording a notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: UserId,
    pub kind: NotificationType,
    pub title: String,
    pub message: Option<String>,
    pub related_agenda_id: Option<AgendaId>,
    pub related_disposition_id: Option<DispositionId>,
}
