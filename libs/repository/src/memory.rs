use std::{cmp::Ordering, sync::Arc};

use async_trait::async_trait;
use entity::post::{ID_FIELD, ORDER_FIELD};
use entity::prelude::*;
use mongodb::bson::{Bson, Document};
use tokio::sync::RwLock;

use crate::{
    DeleteOutcome, InsertOutcome, PostStore, RepositoryError,
    RepositoryResult, UpdateOutcome,
};

/// Posts kept in process memory, for local runs without a database.
#[derive(Clone, Debug, Default)]
pub struct MemoryPostStore {
    posts: Arc<RwLock<Vec<Document>>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_matches(post: &Document, id: PostId) -> bool {
    post.get_object_id(ID_FIELD).ok() == Some(id.object_id())
}

/// Orders by type first (missing and null, numbers, strings, then
/// everything else), then by value within numbers and strings.
fn compare_post_time(a: &Document, b: &Document) -> Ordering {
    fn rank(value: Option<&Bson>) -> u8 {
        match value {
            None | Some(Bson::Null) => 0,
            Some(Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_)) => 1,
            Some(Bson::String(_)) => 2,
            Some(Bson::DateTime(_)) => 4,
            Some(_) => 3,
        }
    }

    fn number(value: &Bson) -> Option<f64> {
        match value {
            Bson::Int32(v) => Some(f64::from(*v)),
            Bson::Int64(v) => Some(*v as f64),
            Bson::Double(v) => Some(*v),
            _ => None,
        }
    }

    let (a, b) = (a.get(ORDER_FIELD), b.get(ORDER_FIELD));
    rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
        (Some(Bson::String(a)), Some(Bson::String(b))) => a.cmp(b),
        (Some(Bson::DateTime(a)), Some(Bson::DateTime(b))) => a.cmp(b),
        (Some(a), Some(b)) => match (number(a), number(b)) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    })
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn find_all(&self) -> RepositoryResult<Vec<PostEntity>> {
        let mut posts = self.posts.read().await.clone();
        posts.sort_by(compare_post_time);

        Ok(posts.into_iter().map(PostEntity::from).collect())
    }

    async fn find_by_id(
        &self,
        id: PostId,
    ) -> RepositoryResult<Option<PostEntity>> {
        let posts = self.posts.read().await;

        Ok(posts
            .iter()
            .find(|post| id_matches(post, id))
            .cloned()
            .map(PostEntity::from))
    }

    async fn insert(
        &self,
        fields: PostFields,
    ) -> RepositoryResult<InsertOutcome> {
        let id = PostId::generate();
        self.posts.write().await.push(fields.into_new_post(Some(id)));

        Ok(InsertOutcome {
            inserted_count: 1,
            inserted_id: id,
        })
    }

    async fn update(
        &self,
        id: PostId,
        fields: PostFields,
    ) -> RepositoryResult<UpdateOutcome> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.iter_mut().find(|post| id_matches(post, id))
        else {
            return Ok(UpdateOutcome {
                matched_count: 0,
                modified_count: 0,
            });
        };

        let fields = fields.into_document();
        if let Some(new_id) = fields.get(ID_FIELD) {
            if post.get(ID_FIELD) != Some(new_id) {
                return Err(RepositoryError::ImmutableId);
            }
        }

        let mut modified = false;
        for (key, value) in fields {
            if post.get(&key) != Some(&value) {
                post.insert(key, value);
                modified = true;
            }
        }

        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    async fn delete(&self, id: PostId) -> RepositoryResult<DeleteOutcome> {
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|post| !id_matches(post, id));

        Ok(DeleteOutcome {
            deleted_count: (before - posts.len()) as u64,
        })
    }
}
