mod health_check;
mod subscriptions;

pub use health_check::health_check;
pub use subscriptions::{handle_create_subscription, handle_list_subscriptions};
