//! Integration tests for endpoint clients using wiremock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert2::{check, let_assert};
use requisite::{
    FailurePolicy, HyperClient, InitConfig, Interceptors, PatchOperation, PathParts, PathSpec,
    Service, Services,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Post {
    id: u64,
    title: String,
}

fn services(base_url: &str, policy: FailurePolicy) -> Services {
    Services::new(
        HyperClient::new(),
        InitConfig::builder()
            .base_url(base_url)
            .endpoint("posts", "/posts")
            .endpoint("post", "/posts/:id")
            .header("Authorization", "Bearer secret")
            .failure_policy(policy)
            .build(),
    )
}

fn post(id: u64, title: &str) -> Post {
    Post {
        id,
        title: title.to_string(),
    }
}

#[tokio::test]
async fn get_with_params_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/42"))
        .and(query_param("search", "hello world"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": post(42, "Answer")})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let services = services(&mock_server.uri(), FailurePolicy::Soft);
    let_assert!(Ok(endpoint) = services.endpoint("post"));

    let_assert!(
        Ok(response) = endpoint
            .get::<Post>(
                PathParts::new()
                    .param("id", 42)
                    .query("search", "hello world"),
            )
            .await
    );
    check!(response.ok());
    check!(response.status() == Some(200));
    check!(response.data().await == Some(&post(42, "Answer")));
}

#[tokio::test]
async fn post_and_put_send_json() {
    let mock_server = MockServer::start().await;
    let input = post(0, "Draft");

    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": post(1, "Draft")})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/posts/1"))
        .and(body_json(post(1, "Final")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": post(1, "Final")})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let services = services(&mock_server.uri(), FailurePolicy::Strict);
    let_assert!(Ok(posts) = services.endpoint("posts"));

    let_assert!(Ok(created) = posts.post::<Post, _>(&input, PathSpec::none()).await);
    check!(created.status() == Some(201));
    check!(created.into_data().await == Some(post(1, "Draft")));

    let_assert!(Ok(updated) = posts.put::<Post, _>(&post(1, "Final"), "/1").await);
    check!(updated.data().await.map(|post| post.title.as_str()) == Some("Final"));
}

#[tokio::test]
async fn patch_sends_operations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/posts/7"))
        .and(body_json(json!([
            {"op": "replace", "path": "/title", "value": "Renamed"},
            {"op": "move", "path": "/summary", "from": "/excerpt"},
            {"op": "remove", "path": "/draft"}
        ])))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let services = services(&mock_server.uri(), FailurePolicy::Strict);
    let_assert!(Ok(endpoint) = services.endpoint("post"));

    let operations = [
        PatchOperation::replace("/title", json!("Renamed")),
        PatchOperation::move_to("/excerpt", "/summary"),
        PatchOperation::remove("/draft"),
    ];
    let_assert!(
        Ok(response) = endpoint
            .patch::<Value>(&operations, PathParts::new().param("id", 7))
            .await
    );
    check!(response.status() == Some(204));
    check!(response.data().await.is_none());
}

#[tokio::test]
async fn delete_and_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/posts/9"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"data": {"reason": "not found"}})),
        )
        .mount(&mock_server)
        .await;

    let services = services(&mock_server.uri(), FailurePolicy::Strict);
    let_assert!(Ok(endpoint) = services.endpoint("post"));

    let_assert!(Ok(response) = endpoint.delete::<Value>(PathParts::new().param("id", 9)).await);
    check!(!response.ok());
    check!(!response.is_failure());
    check!(response.status() == Some(404));
    check!(response.data().await == Some(&json!({"reason": "not found"})));
}

#[tokio::test]
async fn non_envelope_body_has_no_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "2")
                .set_body_json(json!([post(1, "a"), post(2, "b")])),
        )
        .mount(&mock_server)
        .await;

    let services = services(&mock_server.uri(), FailurePolicy::Strict);
    let_assert!(Ok(posts) = services.endpoint("posts"));

    let_assert!(Ok(response) = posts.get::<Vec<Post>>(PathSpec::none()).await);
    check!(response.header("x-total-count") == Some("2"));
    check!(response.data().await.is_none());
}

#[tokio::test]
async fn raw_client_bypasses_base_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/external/5"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "raw"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    // the configured base URL points nowhere; the raw client must not use it
    let services = services("http://127.0.0.1:1", FailurePolicy::Strict);
    let client = services.raw(format!("{}/external/:id", mock_server.uri()));

    let_assert!(Ok(response) = client.get::<String>(PathParts::new().param("id", 5)).await);
    check!(response.data().await.map(String::as_str) == Some("raw"));
}

#[tokio::test]
async fn base_url_updates_apply_to_existing_clients() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(header("X-Trace", "abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let services = services("http://127.0.0.1:1", FailurePolicy::Strict);
    let_assert!(Ok(posts) = services.endpoint("posts"));

    services.config().set_base_url(mock_server.uri());
    services.config().insert_header("X-Trace", "abc");

    let_assert!(Ok(response) = posts.get::<Value>(PathSpec::none()).await);
    check!(response.ok());
}

#[tokio::test]
async fn soft_failure_notifies_error_interceptor() {
    let errors = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&errors);

    let services = Services::new(
        HyperClient::new(),
        InitConfig::builder()
            .base_url("http://127.0.0.1:1")
            .endpoint("posts", "/posts")
            .interceptors(Interceptors::new().on_error(move |err| {
                seen.lock().expect("lock").push(err.is_connection());
            }))
            .build(),
    );
    let_assert!(Ok(posts) = services.endpoint("posts"));

    let_assert!(Ok(response) = posts.get::<Value>(PathSpec::none()).await);
    check!(response.is_failure());
    check!(!response.ok());
    check!(response.status().is_none());
    check!(response.data().await.is_none());
    check!(*errors.lock().expect("lock") == [true]);
}

#[tokio::test]
async fn strict_failure_is_returned() {
    let services = services("http://127.0.0.1:1", FailurePolicy::Strict);
    let_assert!(Ok(posts) = services.endpoint("posts"));

    let_assert!(Err(err) = posts.get::<Value>(PathSpec::none()).await);
    check!(err.is_connection());
}

#[tokio::test]
async fn timeout_is_a_transport_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .timeout(Duration::from_millis(100))
        .build();
    let services = Services::new(
        client,
        InitConfig::builder()
            .base_url(mock_server.uri())
            .endpoint("slow", "/slow")
            .failure_policy(FailurePolicy::Strict)
            .build(),
    );
    let_assert!(Ok(slow) = services.endpoint("slow"));

    let_assert!(Err(err) = slow.get::<Value>(PathSpec::none()).await);
    check!(err.is_timeout());
}

#[tokio::test]
async fn cancel_aborts_all_in_flight_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let services = services(&mock_server.uri(), FailurePolicy::Strict);
    let_assert!(Ok(endpoint) = services.endpoint("post"));
    let_assert!(Ok(other) = services.endpoint("posts"));

    let cancel = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        endpoint.cancel();
    };
    let (first, second, (), third) = tokio::join!(
        endpoint.get::<Value>(PathParts::new().param("id", 1)),
        endpoint.get::<Value>(PathParts::new().param("id", 2)),
        cancel,
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            other.cancel_token().is_cancelled()
        },
    );

    let_assert!(Err(first) = first);
    let_assert!(Err(second) = second);
    check!(first.is_cancelled());
    check!(second.is_cancelled());
    check!(!third);
}

#[tokio::test]
async fn logging_layer_is_transparent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": post(3, "logged")})))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder().with_debug_logging().build();
    let config = services(&mock_server.uri(), FailurePolicy::Strict)
        .config()
        .clone();
    let endpoint = Service::with_client(client, "/posts/:id", config);

    let_assert!(Ok(response) = endpoint.get::<Post>(PathParts::new().param("id", 3)).await);
    check!(response.into_data().await == Some(post(3, "logged")));
}
