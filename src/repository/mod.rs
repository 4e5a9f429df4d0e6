pub mod document_store;
pub mod in_memory;

use async_trait::async_trait;

use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::telemetry::error_chain_fmt;

/// Storage port for subscribers.
///
/// Exactly one implementation is bound at startup (see
/// `startup::build_repository`) and shared behind an `Arc` for the lifetime
/// of the process. `add` is the only mutating operation; implementations must
/// be safe to call concurrently from multiple in-flight requests.
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Persists a new subscriber, assigning its id and subscription
    /// timestamp. The email has already been validated and normalized by
    /// `SubscriberEmail::parse`.
    async fn add(&self, email: SubscriberEmail) -> Result<Subscriber, RepositoryError>;

    /// Snapshot of every stored subscriber. Insertion order for the
    /// in-memory variant; backend-defined order for the document store.
    async fn get_all(&self) -> Result<Vec<Subscriber>, RepositoryError>;

    /// Case-insensitive exact-match lookup. A miss is `Ok(None)`.
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, RepositoryError>;
}

#[derive(thiserror::Error)]
pub enum RepositoryError {
    #[error("{0} is already subscribed")]
    DuplicateSubscriber(String),
    #[error("The storage backend is unavailable")]
    StorageUnavailable(#[source] anyhow::Error),
}

impl std::fmt::Debug for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
