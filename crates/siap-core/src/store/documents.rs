//! Typed CRUD store for uploaded-file metadata
//!
//! The bytes themselves live in external object storage; only the metadata
//! row is owned here.

use super::storage::{page, Storage, Table};
use crate::error::Result;
use crate::types::{Document, DocumentId, NewDocument, UserId};
use chrono::Utc;
use std::sync::Arc;

#[derive(Clone)]
pub struct DocumentStore {
    storage: Arc<Storage>,
}

impl DocumentStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn create(&self, new: NewDocument, uploaded_by: UserId) -> Result<Document> {
        let now = Utc::now();
        let document = Document {
            id: DocumentId::new(self.storage.next_id(Table::Documents)),
            agenda_id: new.agenda_id,
            disposition_id: new.disposition_id,
            file_name: new.file_name,
            file_key: new.file_key,
            file_url: new.file_url,
            file_type: new.file_type,
            file_size: new.file_size,
            document_type: new.document_type,
            uploaded_by,
            created_at: now,
            updated_at: now,
        };

        self.storage
            .write_row(Table::Documents, document.id.value(), &document)?;
        Ok(document)
    }

    pub fn get(&self, id: DocumentId) -> Result<Option<Document>> {
        self.storage.read_row(Table::Documents, id.value())
    }

    /// List documents, most recently uploaded first
    pub fn list(&self, limit: usize, offset: usize) -> Result<Vec<Document>> {
        let mut documents: Vec<Document> = self.storage.read_all(Table::Documents)?;
        documents.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.value().cmp(&a.id.value()))
        });
        Ok(page(documents, limit, offset))
    }

    pub fn delete(&self, id: DocumentId) -> Result<bool> {
        self.storage.remove_row(Table::Documents, id.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgendaId, DocumentType};
    use tempfile::TempDir;

    fn store() -> (TempDir, DocumentStore) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Arc::new(Storage::open(temp_dir.path()).unwrap());
        (temp_dir, DocumentStore::new(storage))
    }

    fn new_document(name: &str) -> NewDocument {
        NewDocument {
            agenda_id: Some(AgendaId::new(3)),
            disposition_id: None,
            file_name: name.to_string(),
            file_key: format!("uploads/{}", name),
            file_url: format!("https://files.example.go.id/uploads/{}", name),
            file_type: Some("application/pdf".to_string()),
            file_size: Some(120_000),
            document_type: DocumentType::Invitation,
        }
    }

    #[test]
    fn test_create_and_get() {
        let (_guard, store) = store();

        let document = store
            .create(new_document("undangan.pdf"), UserId::new(4))
            .unwrap();

        let loaded = store.get(document.id).unwrap().unwrap();
        assert_eq!(loaded.file_name, "undangan.pdf");
        assert_eq!(loaded.uploaded_by, UserId::new(4));
        assert_eq!(loaded.agenda_id, Some(AgendaId::new(3)));
    }

    #[test]
    fn test_list_newest_first_with_window() {
        let (_guard, store) = store();
        for i in 1..=4 {
            store
                .create(new_document(&format!("file{}.pdf", i)), UserId::new(1))
                .unwrap();
        }

        let window = store.list(2, 1).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].file_name, "file3.pdf");
        assert_eq!(window[1].file_name, "file2.pdf");
    }

    #[test]
    fn test_delete() {
        let (_guard, store) = store();
        let document = store
            .create(new_document("gone.pdf"), UserId::new(1))
            .unwrap();

        assert!(store.delete(document.id).unwrap());
        assert!(store.get(document.id).unwrap().is_none());
    }
}
