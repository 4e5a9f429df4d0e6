use chrono::{DateTime, Utc};

use crate::domain::subscriber_email::SubscriberEmail;

/// One persisted newsletter registration.
///
/// Instances are created exclusively by a repository's `add` operation, which
/// assigns `id` and `subscribed_at`; callers never build one with an id of
/// their own. Field names in the JSON representation (`id`, `email`,
/// `subscribedAt`) are stable.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: String,
    pub email: SubscriberEmail,
    pub subscribed_at: DateTime<Utc>,
}
