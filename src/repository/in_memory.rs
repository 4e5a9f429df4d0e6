use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::repository::{RepositoryError, SubscriberRepository};

#[derive(Default)]
struct Store {
    // Ids are a per-instance counter; they are never handed out twice.
    next_id: u64,
    subscribers: Vec<Subscriber>,
    // Normalized email -> position in `subscribers`.
    index: HashMap<String, usize>,
}

/// Volatile repository variant: everything lives in one process-local store
/// and dies with the process.
///
/// `add` runs its whole check-then-insert sequence under the write lock, so
/// when N callers race on the same email exactly one wins and the rest get
/// `DuplicateSubscriber`. Readers share the read lock and never see a
/// half-inserted record.
#[derive(Default)]
pub struct InMemoryRepository {
    store: RwLock<Store>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriberRepository for InMemoryRepository {
    #[tracing::instrument(
        name = "Insert a new subscriber into the in-memory store",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    async fn add(&self, email: SubscriberEmail) -> Result<Subscriber, RepositoryError> {
        let mut store = self
            .store
            .write()
            .map_err(|_| RepositoryError::StorageUnavailable(anyhow::anyhow!("Lock poisoned")))?;

        if store.index.contains_key(email.as_ref()) {
            return Err(RepositoryError::DuplicateSubscriber(
                email.as_ref().to_string(),
            ));
        }

        store.next_id += 1;

        let subscriber = Subscriber {
            id: store.next_id.to_string(),
            email,
            subscribed_at: Utc::now(),
        };
        let position = store.subscribers.len();

        store
            .index
            .insert(subscriber.email.as_ref().to_string(), position);
        store.subscribers.push(subscriber.clone());

        Ok(subscriber)
    }

    async fn get_all(&self) -> Result<Vec<Subscriber>, RepositoryError> {
        let store = self
            .store
            .read()
            .map_err(|_| RepositoryError::StorageUnavailable(anyhow::anyhow!("Lock poisoned")))?;

        Ok(store.subscribers.clone())
    }

    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, RepositoryError> {
        let store = self
            .store
            .read()
            .map_err(|_| RepositoryError::StorageUnavailable(anyhow::anyhow!("Lock poisoned")))?;

        Ok(store
            .index
            .get(email.as_ref())
            .map(|&position| store.subscribers[position].clone()))
    }
}
