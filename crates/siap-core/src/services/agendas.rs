//! Agenda orchestration: CRUD with audit and best-effort announcements

use crate::audit::{AuditAction, AuditLogStore, ChangeSet, EntityType};
use crate::error::{Result, SiapError};
use crate::notify::{render_agenda_email, Delivery, Notifier};
use crate::store::{AgendaStore, NotificationStore, UserStore};
use crate::types::{
    Actor, Agenda, AgendaId, AgendaPatch, NewAgenda, NewNotification, NotificationType,
    RequestMeta,
};
use std::sync::Arc;

pub struct AgendaService {
    agendas: AgendaStore,
    users: UserStore,
    notifications: NotificationStore,
    audit: AuditLogStore,
    notifier: Arc<dyn Notifier>,
}

impl AgendaService {
    pub fn new(
        agendas: AgendaStore,
        users: UserStore,
        notifications: NotificationStore,
        audit: AuditLogStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            agendas,
            users,
            notifications,
            audit,
            notifier,
        }
    }

    /// Create an agenda and announce it: audit entry, a notification row for
    /// the creator, an owner alert, and a confirmation email when the
    /// creator has an address on file. All announcements are best-effort.
    pub async fn create(
        &self,
        new: NewAgenda,
        actor: &Actor,
        meta: Option<RequestMeta>,
    ) -> Result<Agenda> {
        let agenda = self.agendas.create(new, actor.id)?;

        self.audit.record(
            actor.id,
            AuditAction::Create,
            EntityType::Agenda,
            agenda.id.value(),
            ChangeSet::Created {
                after: serde_json::to_value(&agenda)?,
            },
            meta,
        )?;

        log::info!("Created agenda {} '{}' by user {}", agenda.id, agenda.title, actor.id);

        self.announce_created(&agenda).await;

        Ok(agenda)
    }

    pub async fn update(
        &self,
        id: AgendaId,
        patch: AgendaPatch,
        actor: &Actor,
        meta: Option<RequestMeta>,
    ) -> Result<Agenda> {
        let before = self
            .agendas
            .get(id)?
            .ok_or_else(|| SiapError::NotFound(format!("Agenda {} not found", id)))?;

        let updated = self
            .agendas
            .update(id, patch, actor.id)?
            .ok_or_else(|| SiapError::NotFound(format!("Agenda {} not found", id)))?;

        self.audit.record(
            actor.id,
            AuditAction::Update,
            EntityType::Agenda,
            id.value(),
            ChangeSet::Updated {
                before: serde_json::to_value(&before)?,
                after: serde_json::to_value(&updated)?,
            },
            meta,
        )?;

        // Let the organizer know someone else touched their agenda
        if before.created_by != actor.id {
            if let Err(e) = self.notifications.create(NewNotification {
                user_id: before.created_by,
                kind: NotificationType::AgendaUpdated,
                title: "Agenda diperbarui".to_string(),
                message: Some(format!("Agenda '{}' telah diperbarui", updated.title)),
                related_agenda_id: Some(id),
                related_disposition_id: None,
            }) {
                log::warn!("Failed to record agenda-updated notification: {}", e);
            }
        }

        Ok(updated)
    }

    /// Delete an agenda, keeping the full prior snapshot in the audit trail.
    /// A missing id fails with NotFound and writes nothing.
    pub async fn delete(
        &self,
        id: AgendaId,
        actor: &Actor,
        meta: Option<RequestMeta>,
    ) -> Result<()> {
        let agenda = self
            .agendas
            .get(id)?
            .ok_or_else(|| SiapError::NotFound(format!("Agenda {} not found", id)))?;

        self.agendas.delete(id)?;

        self.audit.record(
            actor.id,
            AuditAction::Delete,
            EntityType::Agenda,
            id.value(),
            ChangeSet::Deleted {
                before: serde_json::to_value(&agenda)?,
            },
            meta,
        )?;

        log::info!("Deleted agenda {} by user {}", id, actor.id);
        Ok(())
    }

    async fn announce_created(&self, agenda: &Agenda) {
        let notification = self.notifications.create(NewNotification {
            user_id: agenda.created_by,
            kind: NotificationType::AgendaCreated,
            title: "Agenda baru dibuat".to_string(),
            message: Some(format!("Agenda '{}' telah terdaftar", agenda.title)),
            related_agenda_id: Some(agenda.id),
            related_disposition_id: None,
        });
        let notification = match notification {
            Ok(notification) => Some(notification),
            Err(e) => {
                log::warn!("Failed to record agenda-created notification: {}", e);
                None
            }
        };

        match self
            .notifier
            .notify_owner(
                "Agenda baru dibuat",
                &format!(
                    "Agenda '{}' pada {} oleh {}",
                    agenda.title,
                    agenda.event_date.format("%Y-%m-%d %H:%M"),
                    agenda.organizer
                ),
            )
            .await
        {
            Ok(Delivery::Delivered) => {}
            Ok(Delivery::NotDelivered) => log::warn!("Agenda owner alert was not delivered"),
            Err(e) => log::warn!("Agenda owner alert failed: {}", e),
        }

        let email = match self.users.get(agenda.created_by) {
            Ok(Some(user)) => user.email,
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to resolve agenda creator {}: {}", agenda.created_by, e);
                None
            }
        };
        let Some(email) = email else { return };

        let html = render_agenda_email(
            &agenda.title,
            &agenda.event_date.format("%Y-%m-%d %H:%M").to_string(),
            agenda.event_location.as_deref().unwrap_or("-"),
            &agenda.organizer,
            agenda.description.as_deref().unwrap_or("-"),
        );

        match self.notifier.send_email(&email, "Agenda baru", &html).await {
            Ok(Delivery::Delivered) => {
                if let Some(notification) = notification {
                    if let Err(e) = self.notifications.mark_email_sent(notification.id) {
                        log::warn!("Failed to flag email_sent: {}", e);
                    }
                }
            }
            Ok(Delivery::NotDelivered) => log::warn!("Agenda email to {} was not delivered", email),
            Err(e) => log::warn!("Agenda email to {} failed: {}", email, e),
        }
    }
}
