use std::collections::HashMap;

use crate::helpers::TestApp;

#[tokio::test]
async fn subscribe_returns_201_when_body_is_valid() {
    let test_app = TestApp::spawn_app().await;
    let mut body = HashMap::new();

    body.insert("email", "frank@test.com");

    let response = test_app.post_subscription(body).await;

    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn subscribe_returns_the_created_subscriber() {
    let test_app = TestApp::spawn_app().await;
    let mut body = HashMap::new();

    body.insert("email", "frank@test.com");

    let response = test_app.post_subscription(body).await;
    let subscriber: serde_json::Value = response
        .json()
        .await
        .expect("Response body was not valid JSON.");

    assert_eq!(subscriber["email"], "frank@test.com");
    assert!(!subscriber["id"].as_str().unwrap().is_empty());
    assert!(subscriber["subscribedAt"].is_string());
}

#[tokio::test]
async fn subscribe_persists_the_new_subscriber() {
    let test_app = TestApp::spawn_app().await;
    let mut body = HashMap::new();

    body.insert("email", "test@test.com");

    test_app.post_subscription(body).await;

    let response = test_app.get_subscriptions().await;

    assert_eq!(200, response.status().as_u16());

    let subscribers: Vec<serde_json::Value> = response
        .json()
        .await
        .expect("Response body was not valid JSON.");

    assert_eq!(subscribers.len(), 1);
    assert_eq!(subscribers[0]["email"], "test@test.com");
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_missing_or_invalid() {
    let test_app = TestApp::spawn_app().await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases: Vec<(HashMap<&str, &str>, &str)> = vec![
        (HashMap::from([]), "missing email parameter"),
        (HashMap::from([("email", "")]), "email cannot be empty"),
        (
            HashMap::from([("email", "not-an-email")]),
            "email without a domain",
        ),
        (
            HashMap::from([("email", "@test.com")]),
            "email without a subject",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_subscription(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn subscribe_returns_409_when_email_is_already_subscribed() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_subscription(HashMap::from([("email", "frank@test.com")]))
        .await;

    assert_eq!(201, response.status().as_u16());

    // Case variations count as the same address.
    let response = test_app
        .post_subscription(HashMap::from([("email", "FRANK@test.com")]))
        .await;

    assert_eq!(409, response.status().as_u16());

    let subscribers: Vec<serde_json::Value> = test_app
        .get_subscriptions()
        .await
        .json()
        .await
        .expect("Response body was not valid JSON.");

    assert_eq!(subscribers.len(), 1);
}

#[tokio::test]
async fn subscribers_are_listed_in_insertion_order() {
    let test_app = TestApp::spawn_app().await;

    for email in ["a@x.com", "b@x.com", "c@x.com"] {
        test_app
            .post_subscription(HashMap::from([("email", email)]))
            .await;
    }

    let subscribers: Vec<serde_json::Value> = test_app
        .get_subscriptions()
        .await
        .json()
        .await
        .expect("Response body was not valid JSON.");

    let emails: Vec<&str> = subscribers
        .iter()
        .map(|subscriber| subscriber["email"].as_str().unwrap())
        .collect();

    assert_eq!(emails, vec!["a@x.com", "b@x.com", "c@x.com"]);
}
