use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::ResponseError;

use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::repository::{RepositoryError, SubscriberRepository};
use crate::telemetry::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    InvalidEmail(String),
    #[error("{0} is already subscribed")]
    AlreadySubscribed(String),
    #[error("The storage backend is unavailable")]
    StorageUnavailable(#[source] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<RepositoryError> for SubscribeError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateSubscriber(email) => SubscribeError::AlreadySubscribed(email),
            RepositoryError::StorageUnavailable(source) => {
                SubscribeError::StorageUnavailable(source)
            }
        }
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
            SubscribeError::AlreadySubscribed(_) => StatusCode::CONFLICT,
            SubscribeError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl ResponseError for RepositoryError {
    fn status_code(&self) -> StatusCode {
        match self {
            RepositoryError::DuplicateSubscriber(_) => StatusCode::CONFLICT,
            RepositoryError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Thin orchestration over the repository variant bound at startup: validates
/// input, delegates, and translates repository failures into caller-facing
/// outcomes. Holds no state of its own.
pub struct NewsletterService {
    repository: Arc<dyn SubscriberRepository>,
}

impl NewsletterService {
    pub fn new(repository: Arc<dyn SubscriberRepository>) -> Self {
        Self { repository }
    }

    /// Registers a new subscriber. Validation happens here, before any
    /// repository call, so an invalid email never reaches storage.
    #[tracing::instrument(
        name = "Subscribe a new email",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    pub async fn subscribe(&self, email: String) -> Result<Subscriber, SubscribeError> {
        let email = SubscriberEmail::parse(email).map_err(SubscribeError::InvalidEmail)?;
        let subscriber = self.repository.add(email).await?;

        Ok(subscriber)
    }

    /// Passthrough of the repository snapshot.
    #[tracing::instrument(name = "List all subscribers", skip(self))]
    pub async fn list_subscribers(&self) -> Result<Vec<Subscriber>, RepositoryError> {
        self.repository.get_all().await
    }

    /// Case-insensitive lookup; `Ok(None)` on a miss.
    #[tracing::instrument(
        name = "Look up a subscriber",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    pub async fn find_subscriber(&self, email: &str) -> Result<Option<Subscriber>, SubscribeError> {
        let email =
            SubscriberEmail::parse(email.to_string()).map_err(SubscribeError::InvalidEmail)?;
        let subscriber = self.repository.find_by_email(&email).await?;

        Ok(subscriber)
    }
}
