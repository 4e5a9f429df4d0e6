use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use crate::config::DocumentStoreSettings;
use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::repository::{RepositoryError, SubscriberRepository};

// Server error code for a unique-index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Wire representation of one subscriber document. The backend key is the
/// canonical `_id` ObjectId; `email` and `subscribedAt` field names must stay
/// stable for interoperability with existing collections.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct SubscriberDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    email: String,
    #[serde(rename = "subscribedAt", with = "chrono_datetime_as_bson_datetime")]
    subscribed_at: DateTime<Utc>,
}

impl SubscriberDocument {
    fn into_subscriber(self) -> Result<Subscriber, anyhow::Error> {
        let id = self
            .id
            .map(|object_id| object_id.to_hex())
            .ok_or_else(|| anyhow::anyhow!("Stored subscriber document is missing its _id"))?;
        let email = SubscriberEmail::parse(self.email).map_err(|err| anyhow::anyhow!(err))?;

        Ok(Subscriber {
            id,
            email,
            subscribed_at: self.subscribed_at,
        })
    }
}

/// Durable repository variant backed by a document collection.
///
/// Concurrency control is delegated to the driver (the client pools
/// connections and is safe to share) and to the backend. Duplicate detection
/// relies on the deployment carrying a unique index on `email`; without that
/// index it is best-effort only, since `add` inserts without a client-side
/// uniqueness pre-check.
pub struct DocumentStoreRepository {
    collection: Collection<SubscriberDocument>,
}

impl DocumentStoreRepository {
    /// Builds a client from the connection string and resolves the
    /// configured database and collection. Connections are established
    /// lazily; the short server-selection timeout makes an unreachable
    /// backend surface as `StorageUnavailable` instead of hanging.
    pub async fn connect(settings: &DocumentStoreSettings) -> Result<Self, anyhow::Error> {
        let mut options = ClientOptions::parse(settings.get_connection_string()).await?;

        options.server_selection_timeout = Some(Duration::from_secs(2));
        options.connect_timeout = Some(Duration::from_secs(2));

        let client = Client::with_options(options)?;
        let collection = client
            .database(&settings.get_database_name())
            .collection::<SubscriberDocument>(&settings.get_subscribers_collection_name());

        Ok(Self { collection })
    }
}

fn is_duplicate_key_error(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl SubscriberRepository for DocumentStoreRepository {
    #[tracing::instrument(
        name = "Insert a new subscriber into the document store",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    async fn add(&self, email: SubscriberEmail) -> Result<Subscriber, RepositoryError> {
        let document = SubscriberDocument {
            id: None,
            email: email.as_ref().to_string(),
            subscribed_at: Utc::now(),
        };

        let result = self
            .collection
            .insert_one(&document, None)
            .await
            .map_err(|err| {
                if is_duplicate_key_error(&err) {
                    RepositoryError::DuplicateSubscriber(document.email.clone())
                } else {
                    RepositoryError::StorageUnavailable(err.into())
                }
            })?;

        let id = result
            .inserted_id
            .as_object_id()
            .map(|object_id| object_id.to_hex())
            .ok_or_else(|| {
                RepositoryError::StorageUnavailable(anyhow::anyhow!(
                    "Backend did not assign an ObjectId to the inserted document"
                ))
            })?;

        Ok(Subscriber {
            id,
            email,
            subscribed_at: document.subscribed_at,
        })
    }

    #[tracing::instrument(name = "Fetch all subscribers from the document store", skip(self))]
    async fn get_all(&self) -> Result<Vec<Subscriber>, RepositoryError> {
        let cursor = self
            .collection
            .find(doc! {}, None)
            .await
            .map_err(|err| RepositoryError::StorageUnavailable(err.into()))?;

        let documents: Vec<SubscriberDocument> = cursor
            .try_collect()
            .await
            .map_err(|err| RepositoryError::StorageUnavailable(err.into()))?;

        documents
            .into_iter()
            .map(|document| {
                document
                    .into_subscriber()
                    .map_err(RepositoryError::StorageUnavailable)
            })
            .collect()
    }

    #[tracing::instrument(
        name = "Look up a subscriber in the document store",
        skip(self, email),
        fields(subscriber_email = %email)
    )]
    async fn find_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, RepositoryError> {
        let document = self
            .collection
            .find_one(doc! { "email": email.as_ref() }, None)
            .await
            .map_err(|err| RepositoryError::StorageUnavailable(err.into()))?;

        document
            .map(|document| {
                document
                    .into_subscriber()
                    .map_err(RepositoryError::StorageUnavailable)
            })
            .transpose()
    }
}
