use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};

use crate::error::ApiError;
use crate::images;
use crate::request::{form_body, path_param, require_method};
use crate::responses::{delete_missing, deleted, finish, json, MESSAGE_FIELD};
use crate::store::{from_item, from_items, to_item, Changes, Key, ObjectStore};
use crate::types::{Idea, IdeaForm};
use crate::AppState;

const ID_ATTRIBUTE: &str = "id";
const USER_INDEX: &str = "IdeasIndex";
const USER_ATTRIBUTE: &str = "email";

fn idea_key(id: &str) -> Key {
    Key::new(ID_ATTRIBUTE, id)
}

/// Ideas are keyed by their creation time in milliseconds
fn new_idea_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

fn object_store(state: &AppState) -> Result<&dyn ObjectStore, ApiError> {
    state
        .objects
        .as_deref()
        .ok_or_else(|| ApiError::Internal("object store is not configured".to_string()))
}

/// POST: store the form's image and create the idea record
pub async fn create_idea(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(create(state, event).await, MESSAGE_FIELD, "Error creating Idea")
}

async fn create(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::POST)?;
    let form = IdeaForm::from_fields(form_body(event, "Request body is required")?);
    tracing::info!("Idea form received");

    let content = form
        .content
        .ok_or_else(|| ApiError::bad_request("IdeaContent is required"))?;
    let image = form
        .image
        .ok_or_else(|| ApiError::bad_request("IdeaImage is required"))?;
    let bytes = images::decode_image(&image)?;
    let objects = object_store(state)?;

    let id = new_idea_id();
    let image_url = images::upload_image(objects, &id, bytes).await?;
    let idea = Idea {
        id,
        content,
        image_url,
        email: form.email,
    };

    state.table.put(to_item(&idea)?).await?;
    tracing::info!(id = %idea.id, "Idea created");

    json(
        StatusCode::CREATED,
        &serde_json::json!({ "message": "Idea created successfully", "body": idea }),
    )
}

/// GET: all ideas owned by the `userEmail` path parameter
pub async fn get_ideas_by_user_email(
    state: &AppState,
    event: &Request,
) -> Result<Response<Body>, Error> {
    finish(by_user_email(state, event).await, MESSAGE_FIELD, "Error fetching ideas")
}

async fn by_user_email(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::GET)?;
    let email = path_param(event, "userEmail", "User email is required")?;

    let items = state
        .table
        .query_index(USER_INDEX, USER_ATTRIBUTE, &email)
        .await?;
    let ideas: Vec<Idea> = from_items(items)?;
    tracing::info!(count = ideas.len(), "Ideas fetched successfully");

    json(StatusCode::OK, &ideas)
}

/// GET: one idea by the `id` path parameter
pub async fn get_idea_by_id(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(by_id(state, event).await, MESSAGE_FIELD, "Error fetching Idea")
}

async fn by_id(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::GET)?;
    let id = path_param(event, "id", "Idea ID is required")?;

    let item = state
        .table
        .get(&idea_key(&id))
        .await?
        .ok_or_else(|| ApiError::not_found("Idea not found"))?;
    let idea: Idea = from_item(item)?;

    json(StatusCode::OK, &idea)
}

/// PUT: replace the content and, when supplied, the image of an existing idea
pub async fn update_idea(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(update(state, event).await, MESSAGE_FIELD, "Error updating idea")
}

async fn update(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::PUT)?;
    let id = path_param(event, "id", "Idea ID is required")?;
    let form = IdeaForm::from_fields(form_body(event, "Request body is required")?);

    if form.content.is_none() && form.image.is_none() {
        return Err(ApiError::bad_request("IdeaContent or IdeaImage is required"));
    }
    let bytes = form.image.as_deref().map(images::decode_image).transpose()?;

    // Read and overwrite are separate requests; a concurrent delete in between is not detected
    let key = idea_key(&id);
    let existing: Idea = match state.table.get(&key).await? {
        Some(item) => from_item(item)?,
        None => return Err(ApiError::not_found("Idea not found")),
    };

    let image_url = match bytes {
        Some(bytes) => images::upload_image(object_store(state)?, &id, bytes).await?,
        None => existing.image_url,
    };
    let content = form.content.unwrap_or(existing.content);

    let changes = Changes::new()
        .set("IdeaContent", Some(&content))?
        .set("IdeaImageURL", Some(&image_url))?;
    let attributes = state.table.update(&key, changes.into_inner()).await?;
    tracing::info!(id = %id, "Idea updated");

    let attributes: serde_json::Value = from_item(attributes)?;
    json(StatusCode::OK, &attributes)
}

/// DELETE: remove an idea and its image
pub async fn delete_idea(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(delete(state, event).await, MESSAGE_FIELD, "Error deleting idea")
}

async fn delete(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::DELETE)?;
    let id = path_param(event, "id", "Idea ID is required")?;

    let key = idea_key(&id);
    if state.table.get(&key).await?.is_none() {
        tracing::warn!(id = %id, "Idea does not exists");
        return delete_missing("Idea does not exists");
    }

    state.table.delete(&key).await?;
    tracing::info!(id = %id, "Deleted idea");

    if let Some(objects) = state.objects.as_deref() {
        if let Err(e) = images::delete_image(objects, &id).await {
            tracing::warn!(id = %id, "Failed to delete idea image: {}", e);
        }
    }

    deleted()
}
