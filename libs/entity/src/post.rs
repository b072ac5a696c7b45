use std::{fmt, str::FromStr};

use bson::{oid::ObjectId, Bson, Document};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Key the storage layer keeps the identifier under.
pub const ID_FIELD: &str = "_id";

/// Field posts are listed by.
pub const ORDER_FIELD: &str = "post_time";

/// Storage-assigned identifier of a post, a 12 byte ObjectId that travels
/// over the wire as 24 hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(ObjectId);

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("invalid post id: {0:?}")]
pub struct PostIdError(String);

impl PostId {
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl FromStr for PostId {
    type Err = PostIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| PostIdError(s.to_string()))
    }
}

impl From<ObjectId> for PostId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl From<PostId> for Bson {
    fn from(value: PostId) -> Self {
        Bson::ObjectId(value.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for PostId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

/// A stored post: whatever record the client submitted plus its `_id`.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct Post {
    pub document: Document,
}

impl Post {
    pub fn id(&self) -> Option<PostId> {
        self.document.get_object_id(ID_FIELD).ok().map(PostId)
    }

    pub fn to_json(&self) -> Value {
        to_json(Bson::Document(self.document.clone()))
    }
}

impl From<Document> for Post {
    fn from(document: Document) -> Self {
        Self { document }
    }
}

/// ObjectIds render as bare hex strings, everything else as relaxed
/// extended JSON.
fn to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::Document(document) => Value::Object(
            document
                .into_iter()
                .map(|(key, value)| (key, to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => {
            Value::Array(items.into_iter().map(to_json).collect())
        }
        other => other.into_relaxed_extjson(),
    }
}

/// Keys are kept as written, so `{"$oid": ..}` stays a plain document rather
/// than turning into an ObjectId.
fn to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(value) => Bson::Boolean(value),
        Value::Number(number) => match number.as_i64() {
            Some(value) => Bson::Int64(value),
            None => Bson::Double(number.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(value) => Bson::String(value),
        Value::Array(items) => {
            Bson::Array(items.into_iter().map(to_bson).collect())
        }
        Value::Object(map) => Bson::Document(
            map.into_iter()
                .map(|(key, value)| (key, to_bson(value)))
                .collect(),
        ),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PostFieldsError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("post body must be a JSON object")]
    NotAnObject,
}

/// Client-submitted fields of a post, parsed from a raw request body.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct PostFields(Document);

impl PostFields {
    pub fn from_slice(body: &[u8]) -> Result<Self, PostFieldsError> {
        let Bson::Document(document) =
            to_bson(serde_json::from_slice::<Value>(body)?)
        else {
            return Err(PostFieldsError::NotAnObject);
        };

        Ok(Self(document))
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }

    /// Document to insert under `id`. A client `_id` never survives, the
    /// identifier is always the one handed in.
    pub fn into_new_post(mut self, id: Option<PostId>) -> Document {
        self.0.remove(ID_FIELD);

        let mut document = Document::new();
        if let Some(id) = id {
            document.insert(ID_FIELD, id);
        }
        for (key, value) in self.0 {
            document.insert(key, value);
        }
        document
    }
}

impl From<Document> for PostFields {
    fn from(value: Document) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod test {
    use bson::doc;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_post_id() {
        // Arrange
        let hex = "5f1d7f3c2b9a4e0012345678";

        // Act
        let id = hex.parse::<PostId>();

        // Assert
        assert_eq!(id.unwrap().to_string(), hex);
    }

    #[test]
    fn test_parse_post_id_uppercase() {
        let id = "5F1D7F3C2B9A4E0012345678".parse::<PostId>();

        assert_eq!(id.unwrap().to_string(), "5f1d7f3c2b9a4e0012345678");
    }

    #[test]
    fn test_reject_malformed_post_ids() {
        let malformed = [
            "",
            "abc",
            "5f1d7f3c2b9a4e001234567",
            "5f1d7f3c2b9a4e00123456789",
            "zz1d7f3c2b9a4e0012345678",
            "abcdefghijkl",
        ];

        for id in malformed {
            assert_eq!(
                id.parse::<PostId>(),
                Err(PostIdError(id.to_string())),
                "{id} should be rejected"
            );
        }
    }

    #[test]
    fn test_post_to_json_renders_id_as_hex() {
        // Arrange
        let id = PostId::generate();
        let post = Post::from(doc! {
            "_id": id,
            "title": "Hello",
            "post_time": 1_i64,
            "tags": ["a", "b"],
        });

        // Act
        let json = post.to_json();

        // Assert
        assert_eq!(
            json,
            json!({
                "_id": id.to_string(),
                "title": "Hello",
                "post_time": 1,
                "tags": ["a", "b"],
            })
        );
        assert_eq!(post.id(), Some(id));
    }

    #[test]
    fn test_post_fields_from_slice() {
        let fields =
            PostFields::from_slice(br#"{"title":"x","post_time":2}"#).unwrap();

        assert_eq!(fields.as_document().get_str("title").unwrap(), "x");
        assert_eq!(fields.as_document().get_i64("post_time").unwrap(), 2);
    }

    #[test]
    fn test_post_fields_keep_dollar_keys_literal() {
        // Arrange
        let body = json!({
            "ref": { "$oid": "5f1d7f3c2b9a4e0012345678" },
            "n": { "$numberLong": "5" },
            "at": [{ "$date": 0 }],
        });
        let id = PostId::generate();

        // Act
        let fields = PostFields::from_slice(body.to_string().as_bytes())
            .unwrap();
        let post = Post::from(fields.into_new_post(Some(id)));

        // Assert
        let document = post.document.get_document("ref").unwrap();
        assert_eq!(
            document.get_str("$oid").unwrap(),
            "5f1d7f3c2b9a4e0012345678"
        );
        let mut expected = body;
        expected["_id"] = json!(id.to_string());
        assert_eq!(post.to_json(), expected);
    }

    #[test]
    fn test_post_fields_keep_number_kinds() {
        let body = json!({ "a": 1, "b": -2, "c": 1.5, "d": u64::MAX });

        let fields =
            PostFields::from_slice(body.to_string().as_bytes()).unwrap();

        let document = fields.as_document();
        assert_eq!(document.get("a"), Some(&Bson::Int64(1)));
        assert_eq!(document.get("b"), Some(&Bson::Int64(-2)));
        assert_eq!(document.get("c"), Some(&Bson::Double(1.5)));
        assert_eq!(document.get("d"), Some(&Bson::Double(u64::MAX as f64)));
    }

    #[test]
    fn test_post_fields_reject_malformed_body() {
        let result = PostFields::from_slice(b"{not json");

        assert!(matches!(result, Err(PostFieldsError::Json(_))));
    }

    #[test]
    fn test_post_fields_reject_non_object() {
        let result = PostFields::from_slice(b"[1, 2]");

        assert!(matches!(result, Err(PostFieldsError::NotAnObject)));
    }

    #[test]
    fn test_new_post_drops_client_id() {
        // Arrange
        let fields = PostFields::from(doc! { "_id": "mine", "title": "x" });
        let id = PostId::generate();

        // Act
        let document = fields.into_new_post(Some(id));

        // Assert
        assert_eq!(document, doc! { "_id": id, "title": "x" });
    }
}
