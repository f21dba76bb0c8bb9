use board_shared::{error::ConfigError, ideas, AppState};
use lambda_http::{Body, Error, Request, Response};
use std::str::FromStr;
use std::sync::Arc;

/// Operation a deployed idea function serves, picked by its `HANDLER` name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IdeaHandler {
    Create,
    GetById,
    GetByUserEmail,
    Update,
    Delete,
}

impl FromStr for IdeaHandler {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim() {
            "create-idea" => Ok(Self::Create),
            "get-idea" | "get-idea-by-id" => Ok(Self::GetById),
            "get-ideas-by-user-email" => Ok(Self::GetByUserEmail),
            "update-idea" => Ok(Self::Update),
            "delete-idea" => Ok(Self::Delete),
            other => Err(ConfigError::UnknownHandler(other.to_string())),
        }
    }
}

pub(crate) async fn function_handler(
    handler: IdeaHandler,
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    tracing::info!(
        "Idea function invoked - Handler: {:?} Method: {} Path: {}",
        handler,
        event.method(),
        event.uri().path()
    );

    match handler {
        IdeaHandler::Create => ideas::create_idea(&state, &event).await,
        IdeaHandler::GetById => ideas::get_idea_by_id(&state, &event).await,
        IdeaHandler::GetByUserEmail => ideas::get_ideas_by_user_email(&state, &event).await,
        IdeaHandler::Update => ideas::update_idea(&state, &event).await,
        IdeaHandler::Delete => ideas::delete_idea(&state, &event).await,
    }
}
