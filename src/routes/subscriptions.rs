use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::repository::RepositoryError;
use crate::service::{NewsletterService, SubscribeError};

#[derive(Deserialize)]
pub struct SubscriptionBody {
    pub email: String,
}

#[tracing::instrument(
    name = "Creating a new subscriber handler",
    skip(body, service),
    fields(subscriber_email = %body.email)
)]
pub async fn handle_create_subscription(
    body: web::Json<SubscriptionBody>,
    service: web::Data<NewsletterService>,
) -> Result<HttpResponse, SubscribeError> {
    let subscriber = service.subscribe(body.into_inner().email).await?;

    Ok(HttpResponse::Created().json(subscriber))
}

#[tracing::instrument(name = "Listing subscribers handler", skip(service))]
pub async fn handle_list_subscriptions(
    service: web::Data<NewsletterService>,
) -> Result<HttpResponse, RepositoryError> {
    let subscribers = service.list_subscribers().await?;

    Ok(HttpResponse::Ok().json(subscribers))
}
