use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::user;

use super::model::Contact;
use super::{Id, Status};

#[async_trait]
pub trait ContactRepository {
    async fn insert(&self, c: &Contact) -> super::Result<()>;

    async fn find_by_id(&self, id: &Id) -> super::Result<Option<Contact>>;

    async fn exists(&self, a: &user::Sub, b: &user::Sub) -> super::Result<bool>;

    async fn update_status(&self, c: &Contact) -> super::Result<()>;

    /// Requests still awaiting a response from `sub`.
    async fn count_pending_for(&self, sub: &user::Sub) -> super::Result<usize>;
}

#[derive(Default)]
pub struct InMemoryContactRepository {
    contacts: RwLock<HashMap<Id, Contact>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn insert(&self, c: &Contact) -> super::Result<()> {
        self.contacts.write().await.insert(*c.id(), c.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &Id) -> super::Result<Option<Contact>> {
        Ok(self.contacts.read().await.get(id).cloned())
    }

    async fn exists(&self, a: &user::Sub, b: &user::Sub) -> super::Result<bool> {
        Ok(self
            .contacts
            .read()
            .await
            .values()
            .any(|c| c.involves(a) && c.involves(b)))
    }

    async fn update_status(&self, c: &Contact) -> super::Result<()> {
        self.contacts.write().await.insert(*c.id(), c.clone());
        Ok(())
    }

    async fn count_pending_for(&self, sub: &user::Sub) -> super::Result<usize> {
        Ok(self
            .contacts
            .read()
            .await
            .values()
            .filter(|c| c.involves(sub))
            .filter(|c| matches!(c.status(), Status::Pending { initiator } if initiator.ne(sub)))
            .count())
    }
}
