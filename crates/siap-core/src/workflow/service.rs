//! Disposition approval workflow service
//!
//! Orchestrates status transitions: capability check, transition policy,
//! derived approval stamps, then audit and notification side effects. The
//! stores know nothing about these rules; everything the workflow guarantees
//! is enforced here.

use super::policy::TransitionPolicy;
use crate::audit::{AuditAction, AuditLogStore, ChangeSet, EntityType};
use crate::error::{Result, SiapError};
use crate::notify::{render_disposition_email, Delivery, Notifier};
use crate::store::{DispositionStore, NotificationStore, UserStore};
use crate::types::{
    Actor, Capability, Disposition, DispositionId, DispositionStatus, NewDisposition,
    NewNotification, NotificationType, RequestMeta, UserId,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Result of a status transition. The transition itself is committed even
/// when the audit write failed; the failure is carried as a secondary error
/// instead of unwinding user-facing progress.
#[derive(Debug)]
pub struct TransitionOutcome {
    pub disposition: Disposition,
    pub audit_error: Option<String>,
}

/// Coarse service health derived from the workflow backlog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub total_dispositions: usize,
    pub counts: HashMap<DispositionStatus, usize>,
    pub checked_at: DateTime<Utc>,
}

/// Pending backlog above this marks the service degraded
const DEGRADED_PENDING_BACKLOG: usize = 50;

pub struct DispositionWorkflow {
    dispositions: DispositionStore,
    users: UserStore,
    notifications: NotificationStore,
    audit: AuditLogStore,
    notifier: Arc<dyn Notifier>,
    policy: TransitionPolicy,
}

impl DispositionWorkflow {
    pub fn new(
        dispositions: DispositionStore,
        users: UserStore,
        notifications: NotificationStore,
        audit: AuditLogStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            dispositions,
            users,
            notifications,
            audit,
            notifier,
            policy: TransitionPolicy::default(),
        }
    }

    /// Override the transition policy, e.g. to run the permissive historical
    /// behavior
    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create a disposition in the pending state and fan out the initial
    /// side effects: one audit entry, an assignment notification when an
    /// assignee is named, and the approval-needed alert when approval is
    /// required.
    pub async fn create(
        &self,
        new: NewDisposition,
        actor: &Actor,
        meta: Option<RequestMeta>,
    ) -> Result<Disposition> {
        let disposition = self.dispositions.create(new, actor.id)?;

        self.audit.record(
            actor.id,
            AuditAction::Create,
            EntityType::Disposition,
            disposition.id.value(),
            ChangeSet::Created {
                after: serde_json::to_value(&disposition)?,
            },
            meta,
        )?;

        log::info!(
            "Created disposition {} '{}' by user {}",
            disposition.id,
            disposition.document_title,
            actor.id
        );

        if let Some(assignee) = disposition.assigned_to {
            self.push_notification(
                assignee,
                NotificationType::DispositionAssigned,
                "Disposisi baru ditugaskan".to_string(),
                Some(format!(
                    "Dokumen '{}' didisposisikan kepada Anda",
                    disposition.document_title
                )),
                &disposition,
            );
        }

        if disposition.approval_required {
            self.send_approval_needed(&disposition).await;
        }

        Ok(disposition)
    }

    /// Apply a requested status change.
    ///
    /// Fails with NotFound for an unknown id, Auth when a terminal decision
    /// is attempted without the approve capability, and InvalidTransition
    /// when the policy rejects the edge. On approve the service stamps
    /// approved_by/approval_date itself; on complete it stamps
    /// completion_date. Callers cannot supply those fields.
    pub async fn transition_status(
        &self,
        id: DispositionId,
        new_status: DispositionStatus,
        notes: Option<String>,
        actor: &Actor,
        meta: Option<RequestMeta>,
    ) -> Result<TransitionOutcome> {
        let mut disposition = self
            .dispositions
            .get(id)?
            .ok_or_else(|| SiapError::NotFound(format!("Disposition {} not found", id)))?;

        if matches!(
            new_status,
            DispositionStatus::Approved | DispositionStatus::Rejected
        ) && !actor.has(Capability::Approve)
        {
            return Err(SiapError::Auth(format!(
                "User {} may not decide approvals",
                actor.id
            )));
        }

        let from = disposition.status;
        if !self.policy.allows(from, new_status) {
            return Err(SiapError::InvalidTransition {
                from,
                to: new_status,
            });
        }

        let now = Utc::now();
        disposition.status = new_status;
        if notes.is_some() {
            disposition.approval_notes = notes.clone();
        }
        if new_status == DispositionStatus::Approved {
            disposition.approved_by = Some(actor.id);
            disposition.approval_date = Some(now);
        }
        if new_status == DispositionStatus::Completed {
            disposition.completion_date = Some(now);
        }

        self.dispositions.save(&mut disposition)?;

        log::info!(
            "Disposition {} status {} -> {} by user {}",
            id,
            from,
            new_status,
            actor.id
        );

        // The transition is committed; an audit failure must not unwind it
        let audit_error = match self.audit.record(
            actor.id,
            AuditAction::UpdateStatus,
            EntityType::Disposition,
            id.value(),
            ChangeSet::StatusChanged {
                from,
                to: new_status,
                notes,
            },
            meta,
        ) {
            Ok(_) => None,
            Err(e) => {
                log::error!(
                    "Audit write failed after status change of disposition {}: {}",
                    id,
                    e
                );
                Some(e.to_string())
            }
        };

        self.notify_status_change(&disposition).await;

        Ok(TransitionOutcome {
            disposition,
            audit_error,
        })
    }

    /// Delete a disposition, keeping the prior snapshot in the audit trail
    pub async fn delete(
        &self,
        id: DispositionId,
        actor: &Actor,
        meta: Option<RequestMeta>,
    ) -> Result<()> {
        let disposition = self
            .dispositions
            .get(id)?
            .ok_or_else(|| SiapError::NotFound(format!("Disposition {} not found", id)))?;

        self.dispositions.delete(id)?;

        self.audit.record(
            actor.id,
            AuditAction::Delete,
            EntityType::Disposition,
            id.value(),
            ChangeSet::Deleted {
                before: serde_json::to_value(&disposition)?,
            },
            meta,
        )?;

        log::info!("Deleted disposition {} by user {}", id, actor.id);
        Ok(())
    }

    /// Workflow backlog health, reported by the server health endpoint
    pub fn health_check(&self) -> Result<HealthCheckResult> {
        let counts = self.dispositions.status_counts()?;
        let total_dispositions = counts.values().sum();
        let pending = counts
            .get(&DispositionStatus::Pending)
            .copied()
            .unwrap_or(0);

        let status = if pending > DEGRADED_PENDING_BACKLOG {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        Ok(HealthCheckResult {
            status,
            total_dispositions,
            counts,
            checked_at: Utc::now(),
        })
    }

    /// Notification fan-out after a committed transition. Everything in here
    /// is best-effort: failures are logged and swallowed.
    async fn notify_status_change(&self, disposition: &Disposition) {
        match disposition.status {
            DispositionStatus::Approved => {
                self.push_notification(
                    disposition.notification_recipient(),
                    NotificationType::DispositionApproved,
                    "Disposisi disetujui".to_string(),
                    Some(format!(
                        "Dokumen '{}' telah disetujui{}",
                        disposition.document_title,
                        disposition
                            .approval_notes
                            .as_deref()
                            .map(|n| format!(": {}", n))
                            .unwrap_or_default()
                    )),
                    disposition,
                );
                self.alert_owner(
                    "Disposisi disetujui",
                    &format!("Dokumen '{}' disetujui", disposition.document_title),
                )
                .await;
            }
            DispositionStatus::Rejected => {
                self.push_notification(
                    disposition.notification_recipient(),
                    NotificationType::DispositionRejected,
                    "Disposisi ditolak".to_string(),
                    Some(format!(
                        "Dokumen '{}' ditolak{}",
                        disposition.document_title,
                        disposition
                            .approval_notes
                            .as_deref()
                            .map(|n| format!(": {}", n))
                            .unwrap_or_default()
                    )),
                    disposition,
                );
                self.alert_owner(
                    "Disposisi ditolak",
                    &format!("Dokumen '{}' ditolak", disposition.document_title),
                )
                .await;
            }
            DispositionStatus::Pending if disposition.approval_required => {
                self.send_approval_needed(disposition).await;
            }
            _ => {}
        }
    }

    /// Record the approval-needed notification and push the templated email
    /// to the recipient when an address is known
    async fn send_approval_needed(&self, disposition: &Disposition) {
        let recipient = disposition.notification_recipient();
        let notification = self.push_notification(
            recipient,
            NotificationType::DispositionApprovalNeeded,
            "Disposisi menunggu persetujuan".to_string(),
            Some(format!(
                "Dokumen '{}' memerlukan persetujuan",
                disposition.document_title
            )),
            disposition,
        );

        self.alert_owner(
            "Disposisi menunggu persetujuan",
            &format!(
                "Dokumen '{}' memerlukan persetujuan",
                disposition.document_title
            ),
        )
        .await;

        let email = match self.users.get(recipient) {
            Ok(Some(user)) => user.email,
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to resolve recipient {}: {}", recipient, e);
                None
            }
        };
        let Some(email) = email else { return };

        let html = render_disposition_email(
            &disposition.document_title,
            disposition.document_number.as_deref().unwrap_or("-"),
            disposition.priority,
            &disposition
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            disposition.description.as_deref().unwrap_or("-"),
        );

        match self
            .notifier
            .send_email(&email, "Disposisi memerlukan approval", &html)
            .await
        {
            Ok(Delivery::Delivered) => {
                if let Some(notification) = notification {
                    if let Err(e) = self.notifications.mark_email_sent(notification.id) {
                        log::warn!("Failed to flag email_sent: {}", e);
                    }
                }
            }
            Ok(Delivery::NotDelivered) => {
                log::warn!("Approval email to {} was not delivered", email);
            }
            Err(e) => {
                log::warn!("Approval email to {} failed: {}", email, e);
            }
        }
    }

    /// Insert a notification row, logging instead of failing
    fn push_notification(
        &self,
        user_id: UserId,
        kind: NotificationType,
        title: String,
        message: Option<String>,
        disposition: &Disposition,
    ) -> Option<crate::types::Notification> {
        match self.notifications.create(NewNotification {
            user_id,
            kind,
            title,
            message,
            related_agenda_id: Some(disposition.agenda_id),
            related_disposition_id: Some(disposition.id),
        }) {
            Ok(notification) => Some(notification),
            Err(e) => {
                log::warn!(
                    "Failed to record notification for user {}: {}",
                    user_id,
                    e
                );
                None
            }
        }
    }

    /// Owner alerts never block the workflow
    async fn alert_owner(&self, title: &str, content: &str) {
        match self.notifier.notify_owner(title, content).await {
            Ok(Delivery::Delivered) => {}
            Ok(Delivery::NotDelivered) => {
                log::warn!("Owner alert '{}' was not delivered", title);
            }
            Err(e) => {
                log::warn!("Owner alert '{}' failed: {}", title, e);
            }
        }
    }
}
