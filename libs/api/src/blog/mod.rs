use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use entity::prelude::*;
use repository::Repository;
use tracing::debug;

pub mod response;

use crate::response::{
    ApiResponse, Envelope, IntoApiResponse, NON_EXISTING_POST,
};

use self::response::{
    CreatePostResponse, DeletePostResponse, GetPostResponse, GetPostsResponse,
    UpdatePostResponse,
};

fn parse_post_id<R: Envelope>(post_id: &str) -> Result<PostId, Json<R>> {
    post_id.parse().map_err(|e: PostIdError| {
        debug!(task = "parse post id", error = %e);
        Json(R::invalid_post_id())
    })
}

/// List all posts, oldest `post_time` first
#[utoipa::path(
    get,
    path = "/",
    tag = "blog",
    responses(
        (status = 200, description = "Posts, or the failure envelope", body = GetPostsResponse)
    )
)]
pub async fn get_posts(
    State(repo): State<Repository>,
) -> ApiResponse<GetPostsResponse> {
    let posts = repo
        .post
        .find_all()
        .await
        .into_envelope::<GetPostsResponse>("find posts")?;

    Ok(Json(GetPostsResponse::found(posts)))
}

/// Get a post by id
#[utoipa::path(
    get,
    path = "/{postId}",
    tag = "blog",
    responses(
        (status = 200, description = "The post, or the failure envelope", body = GetPostResponse)
    ),
    params(
        ("postId" = String, Path, description = "24 hex character post id, 12 character strings are not accepted"),
    )
)]
pub async fn get_post(
    State(repo): State<Repository>,
    Path(post_id): Path<String>,
) -> ApiResponse<GetPostResponse> {
    let post_id = parse_post_id::<GetPostResponse>(&post_id)?;

    let post = repo
        .post
        .find_by_id(post_id)
        .await
        .into_envelope::<GetPostResponse>("find post")?;

    let Some(post) = post else {
        return Err(Json(GetPostResponse::failure(
            NON_EXISTING_POST.to_string(),
        )));
    };

    Ok(Json(GetPostResponse::found(&post)))
}

/// Create a post from a JSON object
#[utoipa::path(
    post,
    path = "/",
    tag = "blog",
    responses(
        (status = 200, description = "The new post id, or the failure envelope", body = CreatePostResponse)
    )
)]
pub async fn create_post(
    State(repo): State<Repository>,
    body: Bytes,
) -> ApiResponse<CreatePostResponse> {
    let fields = PostFields::from_slice(&body)
        .into_envelope::<CreatePostResponse>("parse post")?;

    let outcome = repo
        .post
        .insert(fields)
        .await
        .into_envelope::<CreatePostResponse>("insert post")?;

    Ok(Json(outcome.into()))
}

/// Overwrite the submitted fields of a post
#[utoipa::path(
    put,
    path = "/{postId}",
    tag = "blog",
    responses(
        (status = 200, description = "Matched and modified counts, or the failure envelope", body = UpdatePostResponse)
    ),
    params(
        ("postId" = String, Path, description = "24 hex character post id, 12 character strings are not accepted"),
    )
)]
pub async fn update_post(
    State(repo): State<Repository>,
    Path(post_id): Path<String>,
    body: Bytes,
) -> ApiResponse<UpdatePostResponse> {
    let post_id = parse_post_id::<UpdatePostResponse>(&post_id)?;
    let fields = PostFields::from_slice(&body)
        .into_envelope::<UpdatePostResponse>("parse post")?;

    let outcome = repo
        .post
        .update(post_id, fields)
        .await
        .into_envelope::<UpdatePostResponse>("update post")?;

    Ok(Json(outcome.into()))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/{postId}",
    tag = "blog",
    responses(
        (status = 200, description = "Deleted count, or the failure envelope", body = DeletePostResponse)
    ),
    params(
        ("postId" = String, Path, description = "24 hex character post id, 12 character strings are not accepted"),
    )
)]
pub async fn delete_post(
    State(repo): State<Repository>,
    Path(post_id): Path<String>,
) -> ApiResponse<DeletePostResponse> {
    let post_id = parse_post_id::<DeletePostResponse>(&post_id)?;

    let outcome = repo
        .post
        .delete(post_id)
        .await
        .into_envelope::<DeletePostResponse>("delete post")?;

    Ok(Json(outcome.into()))
}
