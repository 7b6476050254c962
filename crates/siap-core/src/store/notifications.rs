//! Store for per-user notification rows
//!
//! Rows are created by the services as domain events happen and mutated only
//! to flip the read/email flags; they are never deleted in normal operation.

use super::storage::{page, Storage, Table};
use crate::error::Result;
use crate::types::{NewNotification, Notification, NotificationId, UserId};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationStore {
    storage: Arc<Storage>,
}

impl NotificationStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn create(&self, new: NewNotification) -> Result<Notification> {
        let notification = Notification {
            id: NotificationId::new(self.storage.next_id(Table::Notifications)),
            user_id: new.user_id,
            kind: new.kind,
            title: new.title,
            message: new.message,
            related_agenda_id: new.related_agenda_id,
            related_disposition_id: new.related_disposition_id,
            is_read: false,
            read_at: None,
            email_sent: false,
            email_sent_at: None,
            created_at: Utc::now(),
        };

        self.storage
            .write_row(Table::Notifications, notification.id.value(), &notification)?;
        Ok(notification)
    }

    /// List one user's notifications, newest first
    pub fn list_for_user(
        &self,
        user_id: UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .storage
            .read_all::<Notification>(Table::Notifications)?
            .into_iter()
            .filter(|n| n.user_id == user_id)
            .collect();
        notifications.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.value().cmp(&a.id.value()))
        });
        Ok(page(notifications, limit, offset))
    }

    /// Flip the read flag; `None` means the notification does not exist
    pub fn mark_read(&self, id: NotificationId) -> Result<Option<Notification>> {
        let Some(mut notification) = self
            .storage
            .read_row::<Notification>(Table::Notifications, id.value())?
        else {
            return Ok(None);
        };

        notification.is_read = true;
        notification.read_at = Some(Utc::now());
        self.storage
            .write_row(Table::Notifications, id.value(), &notification)?;
        Ok(Some(notification))
    }

    /// Record that the email side-channel delivered for this row
    pub fn mark_email_sent(&self, id: NotificationId) -> Result<Option<Notification>> {
        let Some(mut notification) = self
            .storage
            .read_row::<Notification>(Table::Notifications, id.value())?
        else {
            return Ok(None);
        };

        notification.email_sent = true;
        notification.email_sent_at = Some(Utc::now());
        self.storage
            .write_row(Table::Notifications, id.value(), &notification)?;
        Ok(Some(notification))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NotificationType;
    use tempfile::TempDir;

    fn store() -> (TempDir, NotificationStore) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(Storage::open(temp_dir.path()).unwrap());
        (temp_dir, NotificationStore::new(storage))
    }

    fn new_notification(user: i64, title: &str) -> NewNotification {
        NewNotification {
            user_id: UserId::new(user),
            kind: NotificationType::SystemAlert,
            title: title.to_string(),
            message: None,
            related_agenda_id: None,
            related_disposition_id: None,
        }
    }

    #[test]
    fn test_list_filters_by_user_newest_first() {
        let (_guard, store) = store();
        store.create(new_notification(1, "first")).unwrap();
        store.create(new_notification(2, "other user")).unwrap();
        store.create(new_notification(1, "second")).unwrap();

        let mine = store.list_for_user(UserId::new(1), 50, 0).unwrap();
        let titles: Vec<String> = mine.into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[test]
    fn test_list_empty_is_empty() {
        let (_guard, store) = store();
        assert!(store.list_for_user(UserId::new(9), 50, 0).unwrap().is_empty());
    }

    #[test]
    fn test_mark_read_sets_flag_and_timestamp() {
        let (_guard, store) = store();
        let notification = store.create(new_notification(1, "unread")).unwrap();
        assert!(!notification.is_read);

        let updated = store.mark_read(notification.id).unwrap().unwrap();
        assert!(updated.is_read);
        assert!(updated.read_at.is_some());
    }

    #[test]
    fn test_mark_read_missing_is_none() {
        let (_guard, store) = store();
        assert!(store.mark_read(NotificationId::new(44)).unwrap().is_none());
    }

    #[test]
    fn test_mark_email_sent() {
        let (_guard, store) = store();
        let notification = store.create(new_notification(1, "mail me")).unwrap();

        let updated = store.mark_email_sent(notification.id).unwrap().unwrap();
        assert!(updated.email_sent);
        assert!(updated.email_sent_at.is_some());
        // The read flag is untouched
        assert!(!updated.is_read);
    }
}
