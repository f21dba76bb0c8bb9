use chrono::{DateTime, SecondsFormat, Utc};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, Response,
};

use crate::error::ApiError;
use crate::request::{json_body, path_param, require_method};
use crate::responses::{delete_missing, deleted, finish, json, MESSAGE_FIELD};
use crate::store::{from_item, from_items, to_item, Changes, Key};
use crate::types::{CreatePostRequest, Post, UpdatePostRequest};
use crate::AppState;

const ID_ATTRIBUTE: &str = "id";
const EMAIL_INDEX: &str = "EmailIndex";
const EMAIL_ATTRIBUTE: &str = "email";

fn post_key(id: &str) -> Key {
    Key::new(ID_ATTRIBUTE, id)
}

/// `"{millis} | + | {email}"`; existing rows use this exact shape, separator included
pub fn post_id(created: DateTime<Utc>, email: &str) -> String {
    format!("{} | + | {}", created.timestamp_millis(), email)
}

/// POST: create a post keyed by creation time and author
pub async fn create_post(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(create(state, event).await, MESSAGE_FIELD, "Error creating post")
}

async fn create(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::POST)?;
    let req: CreatePostRequest = json_body(event, "Request body is required")?;
    let email = req
        .email
        .filter(|email| !email.is_empty())
        .ok_or_else(|| ApiError::bad_request("email is required"))?;

    let now = Utc::now();
    let post = Post {
        id: post_id(now, &email),
        email,
        post_content: req.post_content,
        created_time: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        scheduled_time: req.scheduled_time,
        channel_posted_to: req.channel_posted_to,
        assets: req.assets,
    };

    state.table.put(to_item(&post)?).await?;
    tracing::info!(id = %post.id, "Post created");

    json(
        StatusCode::CREATED,
        &serde_json::json!({ "message": "Post created successfully", "body": post }),
    )
}

/// GET: all posts by the `userEmail` path parameter
pub async fn get_posts_by_user_email(
    state: &AppState,
    event: &Request,
) -> Result<Response<Body>, Error> {
    finish(by_user_email(state, event).await, MESSAGE_FIELD, "Error fetching posts")
}

async fn by_user_email(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::GET)?;
    let email = path_param(event, "userEmail", "User email is required")?;

    let items = state
        .table
        .query_index(EMAIL_INDEX, EMAIL_ATTRIBUTE, &email)
        .await?;
    let posts: Vec<Post> = from_items(items)?;

    json(StatusCode::OK, &posts)
}

pub async fn get_post_by_id(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(by_id(state, event).await, MESSAGE_FIELD, "Error fetching post")
}

async fn by_id(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::GET)?;
    let id = path_param(event, "id", "Post ID is required")?;

    let item = state
        .table
        .get(&post_key(&id))
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    let post: Post = from_item(item)?;

    json(StatusCode::OK, &post)
}

/// PUT: overwrite the supplied fields.
///
/// There is no existence check, so an unknown id produces a sparse record
/// holding only the supplied fields.
pub async fn update_post(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(update(state, event).await, MESSAGE_FIELD, "Error updating post")
}

async fn update(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::PUT)?;
    let id = path_param(event, "id", "Post ID is required")?;
    let req: UpdatePostRequest = json_body(event, "Request body is required")?;

    let changes = Changes::new()
        .set("postContent", req.post_content.as_ref())?
        .set("scheduledTime", req.scheduled_time.as_ref())?
        .set("channelPostedTo", req.channel_posted_to.as_ref())?
        .set("assets", req.assets.as_ref())?;
    if changes.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let attributes = state.table.update(&post_key(&id), changes.into_inner()).await?;
    tracing::info!(id = %id, "Post updated");

    let attributes: serde_json::Value = from_item(attributes)?;
    json(StatusCode::OK, &attributes)
}

pub async fn delete_post(state: &AppState, event: &Request) -> Result<Response<Body>, Error> {
    finish(delete(state, event).await, MESSAGE_FIELD, "Error deleting post")
}

async fn delete(state: &AppState, event: &Request) -> Result<Response<Body>, ApiError> {
    require_method(event, Method::DELETE)?;
    let id = path_param(event, "id", "Post ID is required")?;

    let key = post_key(&id);
    if state.table.get(&key).await?.is_none() {
        tracing::warn!(id = %id, "Post does not exists");
        return delete_missing("POST does not exists");
    }

    state.table.delete(&key).await?;
    tracing::info!(id = %id, "Deleted post");
    deleted()
}
