use board_shared::{error::ConfigError, users, AppState};
use lambda_http::{Body, Error, Request, Response};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UserHandler {
    Create,
    GetById,
    GetByEmail,
    GetAll,
    Update,
    Register,
    Login,
}

impl FromStr for UserHandler {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim() {
            "create-user" => Ok(Self::Create),
            "get-user" | "get-user-by-id" => Ok(Self::GetById),
            "get-user-by-email" => Ok(Self::GetByEmail),
            "get-all-users" => Ok(Self::GetAll),
            "update-user" => Ok(Self::Update),
            "register-user" => Ok(Self::Register),
            "login-user" => Ok(Self::Login),
            other => Err(ConfigError::UnknownHandler(other.to_string())),
        }
    }
}

pub(crate) async fn function_handler(
    handler: UserHandler,
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    // Bodies here carry passwords, so only the route is logged
    tracing::info!(
        "User function invoked - Handler: {:?} Method: {} Path: {}",
        handler,
        event.method(),
        event.uri().path()
    );

    match handler {
        UserHandler::Create => users::create_user(&state, &event).await,
        UserHandler::GetById => users::get_user_by_id(&state, &event).await,
        UserHandler::GetByEmail => users::get_user_by_email(&state, &event).await,
        UserHandler::GetAll => users::get_all_users(&state, &event).await,
        UserHandler::Update => users::update_user(&state, &event).await,
        UserHandler::Register => users::register_user(&state, &event).await,
        UserHandler::Login => users::login_user(&state, &event).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_shared::store::MemoryTable;
    use lambda_http::{http::Method, RequestExt};
    use std::collections::HashMap;

    fn request(method: Method, body: &str) -> Request {
        lambda_http::http::Request::builder()
            .method(method)
            .uri("/users")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn body_json(response: &Response<Body>) -> serde_json::Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[test]
    fn test_parse_handler_names() {
        let names = [
            ("create-user", UserHandler::Create),
            ("get-user", UserHandler::GetById),
            ("get-user-by-email", UserHandler::GetByEmail),
            ("get-all-users", UserHandler::GetAll),
            ("update-user", UserHandler::Update),
            ("register-user", UserHandler::Register),
            ("login-user", UserHandler::Login),
        ];
        for (name, expected) in names {
            assert_eq!(name.parse::<UserHandler>().unwrap(), expected);
        }

        let err = "delete-user".parse::<UserHandler>().unwrap_err();
        assert_eq!(err.to_string(), "unknown handler \"delete-user\"");
    }

    #[tokio::test]
    async fn test_register_login_and_lookup() {
        let table = Arc::new(MemoryTable::new("user-id"));
        let state = AppState::new(table.clone(), None);
        let creds = r#"{"emailID":"a@b.com","password":"p1"}"#;

        let response = function_handler(UserHandler::Register, request(Method::POST, creds), state.clone())
            .await
            .unwrap();
        assert_eq!(response.status(), 201);

        let response = function_handler(UserHandler::Login, request(Method::POST, creds), state.clone())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let event = request(Method::GET, "").with_query_string_parameters(HashMap::from([(
            "emailID".to_string(),
            "a@b.com".to_string(),
        )]));
        let response = function_handler(UserHandler::GetByEmail, event, state.clone())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let user = body_json(&response);
        assert_eq!(user["emailID"], "a@b.com");
        assert!(user.get("password").is_none());

        let response = function_handler(UserHandler::GetAll, request(Method::GET, ""), state)
            .await
            .unwrap();
        assert_eq!(body_json(&response).as_array().unwrap().len(), 1);
    }
}
