use entity::prelude::*;
use repository::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::response::{Envelope, INVALID_POST_ID};

#[derive(Debug, Serialize, ToSchema)]
pub struct GetPostsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub count: usize,
    #[schema(value_type = Option<Vec<Object>>)]
    pub results: Option<Vec<Value>>,
}

impl GetPostsResponse {
    pub fn found(posts: Vec<PostEntity>) -> Self {
        Self {
            success: true,
            message: None,
            count: posts.len(),
            results: Some(posts.iter().map(PostEntity::to_json).collect()),
        }
    }
}

impl Envelope for GetPostsResponse {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            count: 0,
            results: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GetPostResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub result: Option<Value>,
}

impl GetPostResponse {
    pub fn found(post: &PostEntity) -> Self {
        Self {
            success: true,
            message: None,
            result: Some(post.to_json()),
        }
    }
}

impl Envelope for GetPostResponse {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            result: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePostResponse {
    pub success: bool,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "5f1d7f3c2b9a4e0012345678")]
    pub id: Option<PostId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<InsertOutcome> for CreatePostResponse {
    fn from(value: InsertOutcome) -> Self {
        Self {
            success: true,
            count: value.inserted_count,
            id: Some(value.inserted_id),
            message: None,
        }
    }
}

impl Envelope for CreatePostResponse {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            count: 0,
            id: None,
            message: Some(message),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<UpdateOutcome> for UpdatePostResponse {
    fn from(value: UpdateOutcome) -> Self {
        Self {
            success: true,
            matched_count: Some(value.matched_count),
            modified_count: Some(value.modified_count),
            message: None,
        }
    }
}

impl Envelope for UpdatePostResponse {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            matched_count: None,
            modified_count: Some(0),
            message: Some(message),
        }
    }

    fn invalid_post_id() -> Self {
        Self {
            modified_count: None,
            ..Self::failure(INVALID_POST_ID.to_string())
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletePostResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<DeleteOutcome> for DeletePostResponse {
    fn from(value: DeleteOutcome) -> Self {
        Self {
            success: true,
            deleted_count: Some(value.deleted_count),
            message: None,
        }
    }
}

impl Envelope for DeletePostResponse {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            deleted_count: Some(0),
            message: Some(message),
        }
    }

    fn invalid_post_id() -> Self {
        Self {
            deleted_count: None,
            ..Self::failure(INVALID_POST_ID.to_string())
        }
    }
}
