//! Typed CRUD store for agenda records

use super::storage::{page, Storage, Table};
use crate::error::Result;
use crate::types::{Agenda, AgendaId, AgendaPatch, AgendaStatus, NewAgenda, UserId};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct AgendaStore {
    storage: Arc<Storage>,
}

impl AgendaStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Create an agenda. Ids and timestamps are server-assigned; new agendas
    /// always start as drafts.
    pub fn create(&self, new: NewAgenda, created_by: UserId) -> Result<Agenda> {
        let now = Utc::now();
        let agenda = Agenda {
            id: AgendaId::new(self.storage.next_id(Table::Agendas)),
            title: new.title,
            description: new.description,
            event_date: new.event_date,
            event_location: new.event_location,
            event_type: new.event_type,
            status: AgendaStatus::Draft,
            organizer: new.organizer,
            attendees: new.attendees,
            notes: new.notes,
            created_by,
            updated_by: None,
            created_at: now,
            updated_at: now,
        };

        self.storage
            .write_row(Table::Agendas, agenda.id.value(), &agenda)?;
        Ok(agenda)
    }

    pub fn get(&self, id: AgendaId) -> Result<Option<Agenda>> {
        self.storage.read_row(Table::Agendas, id.value())
    }

    /// List agendas by event date, newest event first
    pub fn list(&self, limit: usize, offset: usize) -> Result<Vec<Agenda>> {
        let mut agendas: Vec<Agenda> = self.storage.read_all(Table::Agendas)?;
        agendas.sort_by(|a, b| {
            b.event_date
                .cmp(&a.event_date)
                .then(b.id.value().cmp(&a.id.value()))
        });
        Ok(page(agendas, limit, offset))
    }

    /// Apply a partial update; `None` means the agenda does not exist
    pub fn update(
        &self,
        id: AgendaId,
        patch: AgendaPatch,
        updated_by: UserId,
    ) -> Result<Option<Agenda>> {
        let Some(mut agenda) = self.get(id)? else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            agenda.title = title;
        }
        if let Some(description) = patch.description {
            agenda.description = Some(description);
        }
        if let Some(event_date) = patch.event_date {
            agenda.event_date = event_date;
        }
        if let Some(event_location) = patch.event_location {
            agenda.event_location = Some(event_location);
        }
        if let Some(event_type) = patch.event_type {
            agenda.event_type = event_type;
        }
        if let Some(organizer) = patch.organizer {
            agenda.organizer = organizer;
        }
        if let Some(attendees) = patch.attendees {
            agenda.attendees = attendees;
        }
        if let Some(status) = patch.status {
            // Agenda status carries no transition rules, any value may follow
            agenda.status = status;
        }
        if let Some(notes) = patch.notes {
            agenda.notes = Some(notes);
        }
        agenda.updated_by = Some(updated_by);
        agenda.updated_at = Utc::now();

        self.storage
            .write_row(Table::Agendas, agenda.id.value(), &agenda)?;
        Ok(Some(agenda))
    }

    pub fn delete(&self, id: AgendaId) -> Result<bool> {
        self.storage.remove_row(Table::Agendas, id.value())
    }

    pub fn count_total(&self) -> Result<usize> {
        Ok(self.storage.read_all::<Agenda>(Table::Agendas)?.len())
    }

    pub fn count_upcoming(&self, now: DateTime<Utc>) -> Result<usize> {
        Ok(self
            .storage
            .read_all::<Agenda>(Table::Agendas)?
            .iter()
            .filter(|a| a.event_date >= now)
            .count())
    }
}
