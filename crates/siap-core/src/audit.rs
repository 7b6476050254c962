//! Append-only audit trail
//!
//! Every mutation writes exactly one entry: who did it, which entity, and a
//! typed delta. The store exposes no update or delete; append-only is held
//! by the interface, not by convention.

use crate::error::Result;
use crate::store::{Storage, Table};
use crate::types::{AuditLogId, DispositionStatus, RequestMeta, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Actions recorded in the trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    UpdateStatus,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::UpdateStatus => "update_status",
        }
    }
}

/// Entity kinds an audit entry can point at. The (entity type, entity id)
/// pairing is advisory; no referential integrity is enforced against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Agenda,
    Disposition,
    Document,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agenda => "agenda",
            Self::Disposition => "disposition",
            Self::Document => "document",
        }
    }
}

/// Closed set of per-action change payloads, serialized uniformly.
/// Snapshots are stored as JSON values so the trail does not break when a
/// record shape evolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeSet {
    Created {
        after: serde_json::Value,
    },
    Updated {
        before: serde_json::Value,
        after: serde_json::Value,
    },
    Deleted {
        before: serde_json::Value,
    },
    StatusChanged {
        from: DispositionStatus,
        to: DispositionStatus,
        notes: Option<String>,
    },
}

/// One audit trail entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: AuditLogId,
    pub user_id: UserId,
    pub action: AuditAction,
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub changes: ChangeSet,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AuditLogStore {
    storage: Arc<Storage>,
}

impl AuditLogStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Append one entry. Either the whole row lands or a storage error is
    /// raised; there is no partial write.
    pub fn record(
        &self,
        user_id: UserId,
        action: AuditAction,
        entity_type: EntityType,
        entity_id: i64,
        changes: ChangeSet,
        meta: Option<RequestMeta>,
    ) -> Result<AuditLog> {
        let meta = meta.unwrap_or_default();
        let entry = AuditLog {
            id: AuditLogId::new(self.storage.next_id(Table::AuditLogs)),
            user_id,
            action,
            entity_type,
            entity_id,
            changes,
            ip_address: meta.ip_address,
            user_agent: meta.user_agent,
            created_at: Utc::now(),
        };

        self.storage
            .write_row(Table::AuditLogs, entry.id.value(), &entry)?;

        log::debug!(
            "Audit: user {} {} {} {}",
            entry.user_id,
            entry.action.as_str(),
            entry.entity_type.as_str(),
            entry.entity_id
        );
        Ok(entry)
    }

    /// Entries for one entity, newest first
    pub fn list_for(
        &self,
        entity_type: EntityType,
        entity_id: i64,
        limit: usize,
    ) -> Result<Vec<AuditLog>> {
        let mut entries: Vec<AuditLog> = self
            .storage
            .read_all::<AuditLog>(Table::AuditLogs)?
            .into_iter()
            .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)
            .collect();
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.value().cmp(&a.id.value()))
        });
        entries.truncate(limit);
        Ok(entries)
    }

    /// Every entry in the trail, newest first. Test and tooling aid.
    pub fn list_all(&self) -> Result<Vec<AuditLog>> {
        let mut entries: Vec<AuditLog> = self.storage.read_all(Table::AuditLogs)?;
        entries.sort_by(|a, b| b.id.value().cmp(&a.id.value()));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, AuditLogStore) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(Storage::open(temp_dir.path()).unwrap());
        (temp_dir, AuditLogStore::new(storage))
    }

    #[test]
    fn test_record_and_list_for_entity() {
        let (_guard, store) = store();

        store
            .record(
                UserId::new(1),
                AuditAction::UpdateStatus,
                EntityType::Disposition,
                10,
                ChangeSet::StatusChanged {
                    from: DispositionStatus::Pending,
                    to: DispositionStatus::Approved,
                    notes: Some("ok".to_string()),
                },
                None,
            )
            .unwrap();
        store
            .record(
                UserId::new(1),
                AuditAction::Delete,
                EntityType::Agenda,
                10,
                ChangeSet::Deleted {
                    before: serde_json::json!({"title": "old"}),
                },
                None,
            )
            .unwrap();
        store
            .record(
                UserId::new(2),
                AuditAction::UpdateStatus,
                EntityType::Disposition,
                10,
                ChangeSet::StatusChanged {
                    from: DispositionStatus::Approved,
                    to: DispositionStatus::Completed,
                    notes: None,
                },
                None,
            )
            .unwrap();

        let entries = store.list_for(EntityType::Disposition, 10, 50).unwrap();
        assert_eq!(entries.len(), 2);
        // Newest first
        assert_eq!(entries[0].user_id, UserId::new(2));
        assert_eq!(entries[1].user_id, UserId::new(1));
        // The agenda entry with the same numeric id is not mixed in
        assert!(entries.iter().all(|e| e.entity_type == EntityType::Disposition));
    }

    #[test]
    fn test_list_for_respects_limit() {
        let (_guard, store) = store();
        for i in 0..5 {
            store
                .record(
                    UserId::new(1),
                    AuditAction::Update,
                    EntityType::Agenda,
                    3,
                    ChangeSet::Updated {
                        before: serde_json::json!({"rev": i}),
                        after: serde_json::json!({"rev": i + 1}),
                    },
                    None,
                )
                .unwrap();
        }

        let entries = store.list_for(EntityType::Agenda, 3, 2).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_request_meta_is_persisted() {
        let (_guard, store) = store();

        let entry = store
            .record(
                UserId::new(9),
                AuditAction::Create,
                EntityType::Document,
                1,
                ChangeSet::Created {
                    after: serde_json::json!({"file_name": "a.pdf"}),
                },
                Some(RequestMeta {
                    ip_address: Some("10.0.0.8".to_string()),
                    user_agent: Some("grpc-client/1.0".to_string()),
                }),
            )
            .unwrap();

        let loaded = store.list_for(EntityType::Document, 1, 1).unwrap();
        assert_eq!(loaded[0].id, entry.id);
        assert_eq!(loaded[0].ip_address.as_deref(), Some("10.0.0.8"));
        assert_eq!(loaded[0].user_agent.as_deref(), Some("grpc-client/1.0"));
    }

    #[test]
    fn test_changeset_serializes_tagged() {
        let changes = ChangeSet::StatusChanged {
            from: DispositionStatus::Pending,
            to: DispositionStatus::Rejected,
            notes: None,
        };
        let json = serde_json::to_value(&changes).unwrap();
        assert_eq!(json["kind"], "status_changed");
        assert_eq!(json["from"], "pending");
        assert_eq!(json["to"], "rejected");
    }
}
