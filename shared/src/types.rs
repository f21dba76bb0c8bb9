use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ========== IDEA ==========
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Idea {
    pub id: String,
    #[serde(rename = "IdeaContent", default)]
    pub content: String,
    /// Null when the object store did not acknowledge the upload
    #[serde(rename = "IdeaImageURL", default)]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Fields of the url-encoded idea form
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IdeaForm {
    pub content: Option<String>,
    /// Base64-encoded image bytes
    pub image: Option<String>,
    pub email: Option<String>,
}

impl IdeaForm {
    pub fn from_fields(mut fields: HashMap<String, String>) -> Self {
        let mut take = |name: &str| fields.remove(name).filter(|v| !v.is_empty());
        Self {
            content: take("IdeaContent"),
            image: take("IdeaImage"),
            email: take("email"),
        }
    }
}

// ========== POST ==========
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_posted_to: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub email: Option<String>,
    pub post_content: Option<String>,
    pub scheduled_time: Option<String>,
    pub channel_posted_to: Option<serde_json::Value>,
    pub assets: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub post_content: Option<String>,
    pub scheduled_time: Option<String>,
    pub channel_posted_to: Option<serde_json::Value>,
    pub assets: Option<serde_json::Value>,
}

// ========== USER ==========
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Absent on records written before every user got a generated id
    #[serde(rename = "user-id", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Empty on rows created by an update of an unknown id
    #[serde(rename = "emailID", default)]
    pub email_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_role: Option<String>,
    #[serde(rename = "teamID", default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl User {
    /// Copy safe to put in a response body
    pub fn without_password(mut self) -> Self {
        self.password = None;
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(rename = "emailID")]
    pub email_id: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub team_role: Option<String>,
    #[serde(rename = "teamID")]
    pub team_id: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub team_role: Option<String>,
    #[serde(rename = "teamID")]
    pub team_id: Option<String>,
    pub username: Option<String>,
}

/// Body of register and login
#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(rename = "emailID")]
    pub email_id: Option<String>,
    pub password: Option<String>,
}
