use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};
use uuid::Uuid;

use crate::credentials::{hash_password, verify_password};
use crate::error::ApiError;
use crate::request::{json_body, path_param, query_param, require_method};
use crate::responses::{finish, json, message, ERROR_FIELD};
use crate::store::{from_item, from_items, to_item, Changes, Key};
use crate::types::{CreateUserRequest, Credentials, UpdateUserRequest, User};
use crate::AppState;

const ID_ATTRIBUTE: &str = "user-id";
const EMAIL_INDEX: &str = "EmailIndex";
const EMAIL_ATTRIBUTE: &str = "emailID";

const MISSING_DATA: &str = "Required data missing in request body";

fn user_key(id: &str) -> Key {
    Key::new(ID_ATTRIBUTE, id)
}

fn required(value: Option<String>) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(MISSING_DATA))
}

async fn find_by_email(state: &AppState, email: &str) -> Result<Option<User>, ApiError> {
    let items = state
        .table
        .query_index(EMAIL_INDEX, EMAIL_ATTRIBUTE, email)
        .await?;
    if items.len() > 1 {
        tracing::warn!(email = %email, count = items.len(), "Several users share an email");
    }
    match items.into_iter().next() {
        Some(item) => Ok(Some(from_item(item)?)),
        None => Ok(None),
    }
}

/// POST: store a user with a generated id and hashed password
pub async fn create_user(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(create(state, event).await, ERROR_FIELD, "Failed to create user")
}

async fn create(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::POST)?;
    let req: CreateUserRequest = json_body(event, MISSING_DATA)?;
    let email_id = required(req.email_id)?;
    let password = required(req.password)?;

    let user = User {
        user_id: Some(Uuid::new_v4().to_string()),
        email_id,
        password: Some(hash_password(&password)?),
        display_name: req.display_name,
        team_role: req.team_role,
        team_id: req.team_id,
        username: req.username,
    };

    state.table.put(to_item(&user)?).await?;
    tracing::info!(user_id = ?user.user_id, "User created");

    json(StatusCode::CREATED, &user.without_password())
}

pub async fn get_user_by_id(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(by_id(state, event).await, ERROR_FIELD, "Failed to fetch user")
}

async fn by_id(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::GET)?;
    let id = path_param(event, "id", "User ID is required")?;

    let item = state
        .table
        .get(&user_key(&id))
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    let user: User = from_item(item)?;

    json(StatusCode::OK, &user.without_password())
}

/// GET: the user whose `emailID` matches the query (or path) parameter
pub async fn get_user_by_email(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(by_email(state, event).await, ERROR_FIELD, "Failed to fetch user")
}

async fn by_email(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::GET)?;
    let email = match query_param(event, "emailID") {
        Some(email) => email,
        None => path_param(event, "emailID", "emailID is required")?,
    };

    let user = find_by_email(state, &email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    json(StatusCode::OK, &user.without_password())
}

pub async fn get_all_users(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(all(state, event).await, ERROR_FIELD, "Failed to fetch users")
}

async fn all(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::GET)?;

    let users: Vec<User> = from_items(state.table.scan().await?)?;
    let users: Vec<User> = users.into_iter().map(User::without_password).collect();
    tracing::info!(count = users.len(), "Fetched users");

    json(StatusCode::OK, &users)
}

/// PUT: overwrite profile fields. Unknown ids are not rejected.
pub async fn update_user(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(update(state, event).await, ERROR_FIELD, "Failed to update user")
}

async fn update(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::PUT)?;
    let id = path_param(event, "id", "User ID is required")?;
    let req: UpdateUserRequest = json_body(event, MISSING_DATA)?;

    let changes = Changes::new()
        .set("displayName", req.display_name.as_ref())?
        .set("teamRole", req.team_role.as_ref())?
        .set("teamID", req.team_id.as_ref())?
        .set("username", req.username.as_ref())?;
    if changes.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let mut attributes = state.table.update(&user_key(&id), changes.into_inner()).await?;
    attributes.remove("password");
    tracing::info!(user_id = %id, "User updated");

    let attributes: serde_json::Value = from_item(attributes)?;
    json(StatusCode::OK, &attributes)
}

/// POST: create a user unless the email is already registered
pub async fn register_user(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(register(state, event).await, ERROR_FIELD, "Failed to create user")
}

async fn register(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::POST)?;
    let creds: Credentials = json_body(event, MISSING_DATA)?;
    let email_id = required(creds.email_id)?;
    let password = required(creds.password)?;

    if find_by_email(state, &email_id).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let user = User {
        user_id: Some(Uuid::new_v4().to_string()),
        email_id,
        password: Some(hash_password(&password)?),
        display_name: None,
        team_role: None,
        team_id: None,
        username: None,
    };
    state.table.put(to_item(&user)?).await?;
    tracing::info!(user_id = ?user.user_id, "User registered");

    message(StatusCode::CREATED, "message", "User Created Successfully")
}

/// POST: check an email/password pair
pub async fn login_user(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(login(state, event).await, ERROR_FIELD, "Failed to login user")
}

async fn login(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::POST)?;
    let creds: Credentials = json_body(event, MISSING_DATA)?;
    let email_id = required(creds.email_id)?;
    let password = required(creds.password)?;

    let user = find_by_email(state, &email_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User does not exist"))?;

    let stored = user.password.as_deref().unwrap_or_default();
    if stored.is_empty() || !verify_password(&password, stored) {
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }

    tracing::info!(user_id = ?user.user_id, "Login successful");
    message(StatusCode::OK, "message", "Login Successful")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryTable, TableStore};
    use crate::testing::{body_json, request, with_path, with_query};
    use std::sync::Arc;

    fn fixture() -> (Arc<AppState>, Arc<MemoryTable>) {
        let table = Arc::new(MemoryTable::new("user-id"));
        (AppState::new(table.clone(), None), table)
    }

    async fn seed(table: &MemoryTable, id: &str, email: &str, password: &str) {
        let user = User {
            user_id: Some(id.to_string()),
            email_id: email.to_string(),
            password: Some(password.to_string()),
            display_name: Some("Ada".to_string()),
            team_role: None,
            team_id: None,
            username: None,
        };
        table.put(to_item(&user).unwrap()).await.unwrap();
    }

    fn credentials(email: &str, password: &str) -> String {
        serde_json::json!({ "emailID": email, "password": password }).to_string()
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (state, table) = fixture();

        let event = request(Method::POST, &credentials("a@b.com", "p1"));
        let response = register_user(&state, &event).await.unwrap();
        assert_eq!(response.status(), 201);
        assert_eq!(
            body_json(&response),
            serde_json::json!({"message": "User Created Successfully"})
        );

        let response = login_user(&state, &event).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response), serde_json::json!({"message": "Login Successful"}));

        let event = request(Method::POST, &credentials("a@b.com", "wrong"));
        let response = login_user(&state, &event).await.unwrap();
        assert_eq!(response.status(), 401);
        assert_eq!(body_json(&response), serde_json::json!({"error": "Invalid password"}));

        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let (state, table) = fixture();
        let event = request(Method::POST, &credentials("a@b.com", "p1"));

        assert_eq!(register_user(&state, &event).await.unwrap().status(), 201);

        let response = register_user(&state, &event).await.unwrap();
        assert_eq!(response.status(), 409);
        assert_eq!(body_json(&response), serde_json::json!({"error": "User already exists"}));
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_register_does_not_store_cleartext() {
        let (state, table) = fixture();
        let event = request(Method::POST, &credentials("a@b.com", "p1"));
        register_user(&state, &event).await.unwrap();

        let users: Vec<User> = from_items(table.scan().await.unwrap()).unwrap();
        let stored = users[0].password.as_deref().unwrap();
        assert_ne!(stored, "p1");
        assert!(verify_password("p1", stored));
        assert!(users[0].user_id.is_some());
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let (state, _table) = fixture();
        let event = request(Method::POST, &credentials("nobody@b.com", "p1"));

        let response = login_user(&state, &event).await.unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(body_json(&response), serde_json::json!({"error": "User does not exist"}));
    }

    #[tokio::test]
    async fn test_login_accepts_legacy_cleartext() {
        let (state, table) = fixture();
        seed(&table, "u-1", "old@b.com", "p1").await;

        let event = request(Method::POST, &credentials("old@b.com", "p1"));
        assert_eq!(login_user(&state, &event).await.unwrap().status(), 200);
    }

    #[tokio::test]
    async fn test_register_and_login_validation() {
        let (state, table) = fixture();

        let event = request(Method::GET, &credentials("a@b.com", "p1"));
        let response = register_user(&state, &event).await.unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(body_json(&response)["error"], "POST method is required");
        assert_eq!(login_user(&state, &event).await.unwrap().status(), 400);

        let response = register_user(&state, &request(Method::POST, "")).await.unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(
            body_json(&response),
            serde_json::json!({"error": "Required data missing in request body"})
        );

        let event = request(Method::POST, r#"{"emailID":"a@b.com"}"#);
        assert_eq!(login_user(&state, &event).await.unwrap().status(), 400);

        let event = request(Method::POST, "not json");
        let response = login_user(&state, &event).await.unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(body_json(&response)["error"], "Invalid request body");

        assert_eq!(table.calls(), 0);
    }

    #[tokio::test]
    async fn test_login_store_failure_is_500() {
        let (state, table) = fixture();
        table.set_failing(true);

        let event = request(Method::POST, &credentials("a@b.com", "p1"));
        let response = login_user(&state, &event).await.unwrap();
        assert_eq!(response.status(), 500);
        assert_eq!(body_json(&response), serde_json::json!({"error": "Failed to login user"}));
    }

    #[tokio::test]
    async fn test_create_user_hides_password() {
        let (state, table) = fixture();
        let event = request(
            Method::POST,
            r#"{"emailID":"a@b.com","password":"p1","displayName":"Ada","teamRole":"admin","teamID":"t-1"}"#,
        );

        let response = create_user(&state, &event).await.unwrap();
        assert_eq!(response.status(), 201);
        let body = body_json(&response);
        assert_eq!(body["emailID"], "a@b.com");
        assert_eq!(body["teamID"], "t-1");
        assert!(body.get("password").is_none());

        let id = body["user-id"].as_str().unwrap();
        let stored: User = from_item(table.snapshot(id).unwrap()).unwrap();
        assert_eq!(stored.team_role.as_deref(), Some("admin"));
        assert_ne!(stored.password.as_deref(), Some("p1"));
    }

    #[tokio::test]
    async fn test_create_user_requires_credentials() {
        let (state, table) = fixture();

        let event = request(Method::POST, r#"{"displayName":"Ada"}"#);
        let response = create_user(&state, &event).await.unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(body_json(&response)["error"], "Required data missing in request body");

        let event = request(Method::PUT, &credentials("a@b.com", "p1"));
        assert_eq!(create_user(&state, &event).await.unwrap().status(), 400);

        assert_eq!(table.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let (state, table) = fixture();
        seed(&table, "u-1", "a@b.com", "p1").await;

        let event = with_path(request(Method::GET, ""), "id", "u-1");
        let response = get_user_by_id(&state, &event).await.unwrap();
        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        assert_eq!(body["displayName"], "Ada");
        assert!(body.get("password").is_none());

        let event = with_path(request(Method::GET, ""), "id", "u-2");
        let response = get_user_by_id(&state, &event).await.unwrap();
        assert_eq!(response.status(), 404);
        assert_eq!(body_json(&response), serde_json::json!({"error": "User not found"}));

        let response = get_user_by_id(&state, &request(Method::GET, "")).await.unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_get_user_by_id_requires_get() {
        let (state, table) = fixture();

        let event = with_path(request(Method::POST, ""), "id", "u-1");
        let response = get_user_by_id(&state, &event).await.unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(body_json(&response)["error"], "GET method is required");
        assert_eq!(table.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_user_by_email() {
        let (state, table) = fixture();
        seed(&table, "u-1", "a@b.com", "p1").await;

        let event = with_query(request(Method::GET, ""), "emailID", "a@b.com");
        let response = get_user_by_email(&state, &event).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response)["user-id"], "u-1");

        let event = with_path(request(Method::GET, ""), "emailID", "a@b.com");
        assert_eq!(get_user_by_email(&state, &event).await.unwrap().status(), 200);

        let event = with_query(request(Method::GET, ""), "emailID", "z@b.com");
        assert_eq!(get_user_by_email(&state, &event).await.unwrap().status(), 404);
    }

    #[tokio::test]
    async fn test_get_user_by_email_requires_email() {
        let (state, table) = fixture();
        let response = get_user_by_email(&state, &request(Method::GET, "")).await.unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(body_json(&response)["error"], "emailID is required");
        assert_eq!(table.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_all_users() {
        let (state, table) = fixture();
        seed(&table, "u-1", "a@b.com", "p1").await;
        seed(&table, "u-2", "c@d.com", "p2").await;

        let response = get_all_users(&state, &request(Method::GET, "")).await.unwrap();
        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.get("password").is_none()));

        let response = get_all_users(&state, &request(Method::POST, "")).await.unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_update_user() {
        let (state, table) = fixture();
        seed(&table, "u-1", "a@b.com", "p1").await;

        let event = with_path(
            request(Method::PUT, r#"{"teamRole":"owner","username":"ada"}"#),
            "id",
            "u-1",
        );
        let response = update_user(&state, &event).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            body_json(&response),
            serde_json::json!({"teamRole": "owner", "username": "ada"})
        );

        let stored: User = from_item(table.snapshot("u-1").unwrap()).unwrap();
        assert_eq!(stored.display_name.as_deref(), Some("Ada"));
        assert_eq!(stored.team_role.as_deref(), Some("owner"));
    }

    #[tokio::test]
    async fn test_sparse_user_from_update_stays_readable() {
        let (state, table) = fixture();
        seed(&table, "u-1", "a@b.com", "p1").await;

        let event = with_path(request(Method::PUT, r#"{"displayName":"Ghost"}"#), "id", "ghost");
        assert_eq!(update_user(&state, &event).await.unwrap().status(), 200);

        let event = with_path(request(Method::GET, ""), "id", "ghost");
        let response = get_user_by_id(&state, &event).await.unwrap();
        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        assert_eq!(body["displayName"], "Ghost");
        assert_eq!(body["emailID"], "");

        let response = get_all_users(&state, &request(Method::GET, "")).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response).as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_user_validation() {
        let (state, table) = fixture();

        let event = with_path(request(Method::PUT, r#"{"password":"x"}"#), "id", "u-1");
        let response = update_user(&state, &event).await.unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(body_json(&response)["error"], "No fields to update");

        let event = with_path(request(Method::POST, r#"{"teamRole":"x"}"#), "id", "u-1");
        assert_eq!(update_user(&state, &event).await.unwrap().status(), 400);

        let event = request(Method::PUT, r#"{"teamRole":"x"}"#);
        assert_eq!(update_user(&state, &event).await.unwrap().status(), 400);

        assert_eq!(table.calls(), 0);
    }
}
