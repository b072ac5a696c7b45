use std::fmt::Display;

use axum::Json;
use tracing::error;

pub const INVALID_POST_ID: &str = "Invalid post id.";
pub const NON_EXISTING_POST: &str = "Non-existing post.";

/// A `{ success, ... }` body. Failures are still sent with status 200, only
/// the `success` flag tells them apart.
pub trait Envelope {
    fn failure(message: String) -> Self;

    fn invalid_post_id() -> Self
    where
        Self: Sized,
    {
        Self::failure(INVALID_POST_ID.to_string())
    }
}

pub type ApiResponse<R> = Result<Json<R>, Json<R>>;

pub trait IntoApiResponse<T> {
    fn into_envelope<R: Envelope>(self, task: &str) -> Result<T, Json<R>>;
}

impl<T, E: Display> IntoApiResponse<T> for Result<T, E> {
    fn into_envelope<R: Envelope>(self, task: &str) -> Result<T, Json<R>> {
        self.map_err(|e| {
            error!(task = task, error = %e);
            Json(R::failure(e.to_string()))
        })
    }
}
