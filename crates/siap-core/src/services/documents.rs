//! Document metadata orchestration: registration and deletion with audit

use crate::audit::{AuditAction, AuditLogStore, ChangeSet, EntityType};
use crate::error::{Result, SiapError};
use crate::store::{DispositionStore, DocumentStore, NotificationStore};
use crate::types::{
    Actor, Document, DocumentId, NewDocument, NewNotification, NotificationType, RequestMeta,
};

pub struct DocumentService {
    documents: DocumentStore,
    dispositions: DispositionStore,
    notifications: NotificationStore,
    audit: AuditLogStore,
}

impl DocumentService {
    pub fn new(
        documents: DocumentStore,
        dispositions: DispositionStore,
        notifications: NotificationStore,
        audit: AuditLogStore,
    ) -> Self {
        Self {
            documents,
            dispositions,
            notifications,
            audit,
        }
    }

    /// Register metadata for a file already uploaded to object storage.
    /// When the document is attached to a disposition, whoever handles that
    /// disposition gets a notification row.
    pub fn register(
        &self,
        new: NewDocument,
        actor: &Actor,
        meta: Option<RequestMeta>,
    ) -> Result<Document> {
        let document = self.documents.create(new, actor.id)?;

        self.audit.record(
            actor.id,
            AuditAction::Create,
            EntityType::Document,
            document.id.value(),
            ChangeSet::Created {
                after: serde_json::to_value(&document)?,
            },
            meta,
        )?;

        log::info!(
            "Registered document {} '{}' by user {}",
            document.id,
            document.file_name,
            actor.id
        );

        if let Some(disposition_id) = document.disposition_id {
            match self.dispositions.get(disposition_id) {
                Ok(Some(disposition)) => {
                    if let Err(e) = self.notifications.create(NewNotification {
                        user_id: disposition.notification_recipient(),
                        kind: NotificationType::DocumentUploaded,
                        title: "Dokumen baru diunggah".to_string(),
                        message: Some(format!(
                            "Berkas '{}' dilampirkan pada disposisi '{}'",
                            document.file_name, disposition.document_title
                        )),
                        related_agenda_id: Some(disposition.agenda_id),
                        related_disposition_id: Some(disposition_id),
                    }) {
                        log::warn!("Failed to record document-uploaded notification: {}", e);
                    }
                }
                Ok(None) => {
                    // The reference is advisory; a dangling link is tolerated
                    log::warn!(
                        "Document {} references missing disposition {}",
                        document.id,
                        disposition_id
                    );
                }
                Err(e) => log::warn!("Failed to load disposition {}: {}", disposition_id, e),
            }
        }

        Ok(document)
    }

    /// Drop the metadata row; the bytes in object storage are not touched
    pub fn delete(&self, id: DocumentId, actor: &Actor, meta: Option<RequestMeta>) -> Result<()> {
        let document = self
            .documents
            .get(id)?
            .ok_or_else(|| SiapError::NotFound(format!("Document {} not found", id)))?;

        self.documents.delete(id)?;

        self.audit.record(
            actor.id,
            AuditAction::Delete,
            EntityType::Document,
            id.value(),
            ChangeSet::Deleted {
                before: serde_json::to_value(&document)?,
            },
            meta,
        )?;

        log::info!("Deleted document {} by user {}", id, actor.id);
        Ok(())
    }
}
