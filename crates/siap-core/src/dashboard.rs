//! Dashboard statistics

use crate::error::Result;
use crate::store::{AgendaStore, DispositionStore};
use crate::types::DispositionStatus;
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_agendas: usize,
    pub upcoming_agendas: usize,
    pub pending_dispositions: usize,
    pub completed_dispositions: usize,
}

/// Collect the dashboard counters in one pass over the stores
pub fn collect_stats(
    agendas: &AgendaStore,
    dispositions: &DispositionStore,
) -> Result<DashboardStats> {
    let now = Utc::now();
    let counts = dispositions.status_counts()?;

    Ok(DashboardStats {
        total_agendas: agendas.count_total()?,
        upcoming_agendas: agendas.count_upcoming(now)?,
        pending_dispositions: counts
            .get(&DispositionStatus::Pending)
            .copied()
            .unwrap_or(0),
        completed_dispositions: counts
            .get(&DispositionStatus::Completed)
            .copied()
            .unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Storage;
    use crate::types::{AgendaId, EventType, NewAgenda, NewDisposition, Priority, UserId};
    use chrono::Duration;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_stats_on_empty_stores() {
        let guard = TempDir::new().unwrap();
        let storage = Arc::new(Storage::open(guard.path()).unwrap());
        let agendas = AgendaStore::new(storage.clone());
        let dispositions = DispositionStore::new(storage);

        let stats = collect_stats(&agendas, &dispositions).unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_agendas: 0,
                upcoming_agendas: 0,
                pending_dispositions: 0,
                completed_dispositions: 0,
            }
        );
    }

    #[test]
    fn test_stats_counts() {
        let guard = TempDir::new().unwrap();
        let storage = Arc::new(Storage::open(guard.path()).unwrap());
        let agendas = AgendaStore::new(storage.clone());
        let dispositions = DispositionStore::new(storage);
        let now = Utc::now();

        for (title, offset) in [("past", -2), ("soon", 1), ("later", 7)] {
            agendas
                .create(
                    NewAgenda {
                        title: title.to_string(),
                        description: None,
                        event_date: now + Duration::days(offset),
                        event_location: None,
                        event_type: EventType::Meeting,
                        organizer: "Protokol".to_string(),
                        attendees: vec![],
                        notes: None,
                    },
                    UserId::new(1),
                )
                .unwrap();
        }

        let mut completed = dispositions
            .create(
                NewDisposition {
                    agenda_id: AgendaId::new(1),
                    document_title: "done".to_string(),
                    document_number: None,
                    description: None,
                    priority: Priority::Low,
                    assigned_to: None,
                    approval_required: false,
                    due_date: None,
                },
                UserId::new(1),
            )
            .unwrap();
        completed.status = DispositionStatus::Completed;
        dispositions.save(&mut completed).unwrap();

        dispositions
            .create(
                NewDisposition {
                    agenda_id: AgendaId::new(1),
                    document_title: "waiting".to_string(),
                    document_number: None,
                    description: None,
                    priority: Priority::Low,
                    assigned_to: None,
                    approval_required: true,
                    due_date: None,
                },
                UserId::new(1),
            )
            .unwrap();

        let stats = collect_stats(&agendas, &dispositions).unwrap();
        assert_eq!(stats.total_agendas, 3);
        assert_eq!(stats.upcoming_agendas, 2);
        assert_eq!(stats.pending_dispositions, 1);
        assert_eq!(stats.completed_dispositions, 1);
    }
}
