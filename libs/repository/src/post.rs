use std::future::Future;

use async_trait::async_trait;
use entity::post::{ID_FIELD, ORDER_FIELD};
use entity::prelude::*;
use futures::TryStreamExt as _;
use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
    Client, Collection,
};
use tracing::debug;

use crate::{
    response::IntoResponse, DeleteOutcome, InsertOutcome, PostStore,
    RepositoryError, RepositoryResult, UpdateOutcome,
};

/// MongoDB backed posts. Every call opens its own client, runs a single
/// collection operation and shuts the client down before returning.
#[derive(Clone, Debug)]
pub struct PostRepository {
    url: String,
    database: String,
    collection: String,
}

impl PostRepository {
    pub fn new(
        url: impl Into<String>,
        database: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            collection: collection.into(),
        }
    }

    async fn scoped<T, F, Fut>(&self, operation: F) -> RepositoryResult<T>
    where
        F: FnOnce(Collection<Document>) -> Fut,
        Fut: Future<Output = RepositoryResult<T>>,
    {
        let client = Client::with_uri_str(&self.url)
            .await
            .into_response("in client connect")?;
        debug!(task = "open connection", database = %self.database);

        let posts = client
            .database(&self.database)
            .collection::<Document>(&self.collection);
        let result = operation(posts).await;

        client.shutdown().await;
        debug!(task = "close connection", database = %self.database);

        result
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<PostEntity>> {
        self.scoped(|posts| async move {
            let options =
                FindOptions::builder().sort(doc! { ORDER_FIELD: 1 }).build();
            let documents: Vec<Document> = posts
                .find(None, options)
                .await
                .into_response("in find")?
                .try_collect()
                .await
                .into_response("in find cursor")?;

            Ok(documents.into_iter().map(PostEntity::from).collect())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: PostId,
    ) -> RepositoryResult<Option<PostEntity>> {
        self.scoped(|posts| async move {
            let post = posts
                .find_one(doc! { ID_FIELD: id }, None)
                .await
                .into_response("in find one")?;

            Ok(post.map(PostEntity::from))
        })
        .await
    }

    async fn insert(
        &self,
        fields: PostFields,
    ) -> RepositoryResult<InsertOutcome> {
        self.scoped(|posts| async move {
            let result = posts
                .insert_one(fields.into_new_post(None), None)
                .await
                .into_response("in insert one")?;

            let Some(id) = result.inserted_id.as_object_id() else {
                return Err(RepositoryError::UnexpectedId(result.inserted_id));
            };

            Ok(InsertOutcome {
                inserted_count: 1,
                inserted_id: id.into(),
            })
        })
        .await
    }

    async fn update(
        &self,
        id: PostId,
        fields: PostFields,
    ) -> RepositoryResult<UpdateOutcome> {
        self.scoped(|posts| async move {
            let result = posts
                .update_one(
                    doc! { ID_FIELD: id },
                    doc! { "$set": fields.into_document() },
                    None,
                )
                .await
                .into_response("in update one")?;

            Ok(UpdateOutcome {
                matched_count: result.matched_count,
                modified_count: result.modified_count,
            })
        })
        .await
    }

    async fn delete(&self, id: PostId) -> RepositoryResult<DeleteOutcome> {
        self.scoped(|posts| async move {
            let result = posts
                .delete_one(doc! { ID_FIELD: id }, None)
                .await
                .into_response("in delete one")?;

            Ok(DeleteOutcome {
                deleted_count: result.deleted_count,
            })
        })
        .await
    }
}
