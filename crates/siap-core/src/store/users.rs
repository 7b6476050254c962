//! Store for user records
//!
//! The session edge upserts users after authentication; the core reads them
//! back to resolve actors and email recipients.

use super::storage::{Storage, Table};
use crate::error::{Result, SiapError};
use crate::types::{Role, UpsertUser, User, UserId};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserStore {
    storage: Arc<Storage>,
}

impl UserStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Insert or update a user keyed by open_id. Fields left as `None` on an
    /// update keep their stored value; role defaults to `user` on insert.
    pub fn upsert(&self, upsert: UpsertUser) -> Result<User> {
        if upsert.open_id.trim().is_empty() {
            return Err(SiapError::Validation(
                "User open_id is required for upsert".to_string(),
            ));
        }

        let now = Utc::now();
        let user = match self.get_by_open_id(&upsert.open_id)? {
            Some(mut existing) => {
                if upsert.name.is_some() {
                    existing.name = upsert.name;
                }
                if upsert.email.is_some() {
                    existing.email = upsert.email;
                }
                if upsert.login_method.is_some() {
                    existing.login_method = upsert.login_method;
                }
                if let Some(role) = upsert.role {
                    existing.role = role;
                }
                if upsert.department.is_some() {
                    existing.department = upsert.department;
                }
                if upsert.position.is_some() {
                    existing.position = upsert.position;
                }
                if upsert.phone.is_some() {
                    existing.phone = upsert.phone;
                }
                existing.updated_at = now;
                existing.last_signed_in = now;
                existing
            }
            None => User {
                id: UserId::new(self.storage.next_id(Table::Users)),
                open_id: upsert.open_id,
                name: upsert.name,
                email: upsert.email,
                login_method: upsert.login_method,
                role: upsert.role.unwrap_or(Role::User),
                department: upsert.department,
                position: upsert.position,
                phone: upsert.phone,
                created_at: now,
                updated_at: now,
                last_signed_in: now,
            },
        };

        self.storage.write_row(Table::Users, user.id.value(), &user)?;
        Ok(user)
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>> {
        self.storage.read_row(Table::Users, id.value())
    }

    pub fn get_by_open_id(&self, open_id: &str) -> Result<Option<User>> {
        Ok(self
            .storage
            .read_all::<User>(Table::Users)?
            .into_iter()
            .find(|u| u.open_id == open_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, UserStore) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(Storage::open(temp_dir.path()).unwrap());
        (temp_dir, UserStore::new(storage))
    }

    #[test]
    fn test_upsert_inserts_with_default_role() {
        let (_guard, store) = store();

        let user = store
            .upsert(UpsertUser {
                open_id: "open-1".to_string(),
                name: Some("Staf Protokol".to_string()),
                email: Some("staf@example.go.id".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(user.id.value(), 1);
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_upsert_updates_existing_keeping_unset_fields() {
        let (_guard, store) = store();

        let created = store
            .upsert(UpsertUser {
                open_id: "open-1".to_string(),
                name: Some("Original".to_string()),
                email: Some("original@example.go.id".to_string()),
                ..Default::default()
            })
            .unwrap();

        let updated = store
            .upsert(UpsertUser {
                open_id: "open-1".to_string(),
                role: Some(Role::Admin),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.name.as_deref(), Some("Original"));
        assert_eq!(updated.email.as_deref(), Some("original@example.go.id"));
        assert!(updated.last_signed_in >= created.last_signed_in);
    }

    #[test]
    fn test_upsert_requires_open_id() {
        let (_guard, store) = store();
        let result = store.upsert(UpsertUser::default());
        assert!(matches!(result, Err(SiapError::Validation(_))));
    }

    #[test]
    fn test_lookup_by_open_id() {
        let (_guard, store) = store();
        store
            .upsert(UpsertUser {
                open_id: "open-7".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert!(store.get_by_open_id("open-7").unwrap().is_some());
        assert!(store.get_by_open_id("missing").unwrap().is_none());
    }
}
