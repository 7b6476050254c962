//! Typed CRUD store for disposition records
//!
//! The store itself enforces nothing about the approval workflow; the
//! invariants around approval stamps live in the workflow service.

use super::storage::{page, Storage, Table};
use crate::error::Result;
use crate::types::{Disposition, DispositionId, DispositionStatus, NewDisposition, UserId};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct DispositionStore {
    storage: Arc<Storage>,
}

impl DispositionStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Create a disposition; the workflow always starts at pending
    pub fn create(&self, new: NewDisposition, created_by: UserId) -> Result<Disposition> {
        let now = Utc::now();
        let disposition = Disposition {
            id: DispositionId::new(self.storage.next_id(Table::Dispositions)),
            agenda_id: new.agenda_id,
            document_title: new.document_title,
            document_number: new.document_number,
            description: new.description,
            priority: new.priority,
            status: DispositionStatus::Pending,
            assigned_to: new.assigned_to,
            approval_required: new.approval_required,
            approved_by: None,
            approval_date: None,
            approval_notes: None,
            due_date: new.due_date,
            completion_date: None,
            created_by,
            created_at: now,
            updated_at: now,
        };

        self.storage
            .write_row(Table::Dispositions, disposition.id.value(), &disposition)?;
        Ok(disposition)
    }

    pub fn get(&self, id: DispositionId) -> Result<Option<Disposition>> {
        self.storage.read_row(Table::Dispositions, id.value())
    }

    /// List dispositions, most recently created first
    pub fn list(&self, limit: usize, offset: usize) -> Result<Vec<Disposition>> {
        let mut dispositions: Vec<Disposition> = self.storage.read_all(Table::Dispositions)?;
        dispositions.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.value().cmp(&a.id.value()))
        });
        Ok(page(dispositions, limit, offset))
    }

    /// Persist a modified disposition, stamping updated_at
    pub fn save(&self, disposition: &mut Disposition) -> Result<()> {
        disposition.updated_at = Utc::now();
        self.storage
            .write_row(Table::Dispositions, disposition.id.value(), disposition)
    }

    pub fn delete(&self, id: DispositionId) -> Result<bool> {
        self.storage.remove_row(Table::Dispositions, id.value())
    }

    pub fn count_by_status(&self, status: DispositionStatus) -> Result<usize> {
        Ok(self
            .storage
            .read_all::<Disposition>(Table::Dispositions)?
            .iter()
            .filter(|d| d.status == status)
            .count())
    }

    /// Count rows per status in one pass, for health checks and stats
    pub fn status_counts(&self) -> Result<HashMap<DispositionStatus, usize>> {
        let mut counts = HashMap::new();
        for disposition in self.storage.read_all::<Disposition>(Table::Dispositions)? {
            *counts.entry(disposition.status).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
