use crate::{RepositoryError, RepositoryResult};

pub(crate) trait IntoResponse<T> {
    fn into_response(self, message: &str) -> RepositoryResult<T>;
}

impl<T> IntoResponse<T> for Result<T, mongodb::error::Error> {
    fn into_response(self, message: &str) -> RepositoryResult<T> {
        self.map_err(|e| RepositoryError::InMongoDbErr {
            message: message.to_string(),
            source: e,
        })
    }
}
