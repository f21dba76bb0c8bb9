use board_shared::{error::ConfigError, posts, AppState};
use lambda_http::{Body, Error, Request, Response};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PostHandler {
    Create,
    GetById,
    GetByUserEmail,
    Update,
    Delete,
}

impl FromStr for PostHandler {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim() {
            "create-post" => Ok(Self::Create),
            "get-post" | "get-post-by-id" => Ok(Self::GetById),
            "get-posts-by-user-email" => Ok(Self::GetByUserEmail),
            "update-post" => Ok(Self::Update),
            "delete-post" => Ok(Self::Delete),
            other => Err(ConfigError::UnknownHandler(other.to_string())),
        }
    }
}

pub(crate) async fn function_handler(
    handler: PostHandler,
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    tracing::info!(
        "Post function invoked - Handler: {:?} Method: {} Path: {}",
        handler,
        event.method(),
        event.uri().path()
    );

    match handler {
        PostHandler::Create => posts::create_post(&state, &event).await,
        PostHandler::GetById => posts::get_post_by_id(&state, &event).await,
        PostHandler::GetByUserEmail => posts::get_posts_by_user_email(&state, &event).await,
        PostHandler::Update => posts::update_post(&state, &event).await,
        PostHandler::Delete => posts::delete_post(&state, &event).await,
    }
}
