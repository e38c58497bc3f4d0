//! reqres.in demo
//!
//! Demonstrates named endpoint clients against an API that wraps its
//! payloads in a `data` envelope.

// Demo-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use requisite::prelude::*;
use serde_json::{Value, json};

// ============================================================================
// Data Types
// ============================================================================

/// A reqres user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Payload to create or update a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserInput {
    pub name: String,
    pub job: String,
}

// ============================================================================
// Endpoints
// ============================================================================

const BASE_URL: &str = "https://reqres.in/api";

/// Endpoint clients for the reqres API.
#[must_use]
pub fn reqres(base_url: &str) -> Services {
    Services::new(
        HyperClient::builder().with_logging().build(),
        InitConfig::builder()
            .base_url(base_url)
            .endpoint("users", "/users")
            .endpoint("user", "/users/:id")
            .header("x-api-key", "reqres-free-v1")
            .build(),
    )
}

/// Fetch one user; `None` when it does not exist or the call failed.
pub async fn find_user(services: &Services, id: u64) -> Result<Option<User>> {
    let response = services
        .endpoint("user")?
        .get::<User>(PathParts::new().param("id", id))
        .await?;
    Ok(response.into_data().await)
}

/// List a page of users.
pub async fn list_users(services: &Services, page: u32) -> Result<Vec<User>> {
    let response = services
        .endpoint("users")?
        .get::<Vec<User>>(PathParts::new().query("page", page))
        .await?;
    Ok(response.into_data().await.unwrap_or_default())
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let services = reqres(BASE_URL);
    println!("Endpoints: {:?}", services.names().collect::<Vec<_>>());

    let users = list_users(&services, 2).await?;
    println!("Page 2: {} users", users.len());

    match find_user(&services, 2).await? {
        Some(user) => println!("User 2: {} {}", user.first_name, user.last_name),
        None => println!("User 2 not found"),
    }

    let users = services.endpoint("users")?;
    let input = UserInput {
        name: "morpheus".to_string(),
        job: "leader".to_string(),
    };
    let created = users.post::<Value, _>(&input, PathSpec::none()).await?;
    println!("Create: status {:?}", created.status());

    let user = services.endpoint("user")?;
    let patched = user
        .patch::<Value>(
            &[PatchOperation::replace("/job", json!("zion resident"))],
            PathParts::new().param("id", 2),
        )
        .await?;
    println!("Patch: status {:?}", patched.status());

    let deleted = user.delete::<Value>(PathParts::new().param("id", 2)).await?;
    println!("Delete: status {:?}", deleted.status());

    // Bypass the base URL for a fully qualified endpoint
    let unknown = services.raw("https://reqres.in/api/unknown/:id");
    let response = unknown.get::<Value>(PathParts::new().param("id", 2)).await?;
    println!("Raw: status {:?} data {:?}", response.status(), response.data().await);

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    fn user(id: u64, first_name: &str) -> User {
        User {
            id,
            email: format!("{}@reqres.in", first_name.to_lowercase()),
            first_name: first_name.to_string(),
            last_name: "Weaver".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_user() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/2"))
            .and(header("x-api-key", "reqres-free-v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": user(2, "Janet"),
                "support": {"url": "https://reqres.in"}
            })))
            .mount(&mock_server)
            .await;

        let services = reqres(&mock_server.uri());
        let found = find_user(&services, 2).await.expect("user");

        assert_eq!(found, Some(user(2, "Janet")));
    }

    #[tokio::test]
    async fn test_missing_user() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/23"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
            .mount(&mock_server)
            .await;

        let services = reqres(&mock_server.uri());
        let found = find_user(&services, 23).await.expect("no transport error");

        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_list_users_with_query_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 2,
                "data": [user(7, "Michael"), user(8, "Lindsay")]
            })))
            .mount(&mock_server)
            .await;

        let services = reqres(&mock_server.uri());
        let users = list_users(&services, 2).await.expect("users");

        assert_eq!(users.len(), 2);
        assert_eq!(users.first().map(|user| user.id), Some(7));
    }
}
