use std::sync::Arc;

use async_trait::async_trait;
use entity::prelude::*;

pub mod memory;
pub mod post;
mod response;

pub use memory::MemoryPostStore;
pub use post::PostRepository;

#[derive(Clone, Debug)]
pub struct Repository {
    pub post: Arc<dyn PostStore>,
}

impl Repository {
    pub fn new(post: impl PostStore) -> Self {
        Self {
            post: Arc::new(post),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{source}")]
    InMongoDbErr {
        message: String,
        source: mongodb::error::Error,
    },

    #[error("storage returned a non ObjectId identifier: {0}")]
    UnexpectedId(mongodb::bson::Bson),

    #[error(
        "Performing an update on the path '_id' would modify the immutable \
         field '_id'"
    )]
    ImmutableId,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    pub inserted_count: u64,
    pub inserted_id: PostId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}

/// One storage operation per call, nothing shared between calls.
#[async_trait]
pub trait PostStore: std::fmt::Debug + Send + Sync + 'static {
    /// All posts, ascending by `post_time`.
    async fn find_all(&self) -> RepositoryResult<Vec<PostEntity>>;

    async fn find_by_id(
        &self,
        id: PostId,
    ) -> RepositoryResult<Option<PostEntity>>;

    async fn insert(&self, fields: PostFields)
        -> RepositoryResult<InsertOutcome>;

    /// Overwrites only the submitted fields. Never inserts.
    async fn update(
        &self,
        id: PostId,
        fields: PostFields,
    ) -> RepositoryResult<UpdateOutcome>;

    async fn delete(&self, id: PostId) -> RepositoryResult<DeleteOutcome>;
}
