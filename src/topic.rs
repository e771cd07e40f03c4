use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Creator {
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
}

/// A top-level discussion thread attached to a visualization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Topic {
    #[serde(rename = "topic_id", default, deserialize_with = "identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
    #[serde(default, deserialize_with = "nullable")]
    pub audience: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    /// Server-reported; may exceed the comments actually present.
    #[serde(default, deserialize_with = "nullable")]
    pub num_comments: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub likes: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub dislikes: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub my_reaction: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub edited: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub created: String,
    #[serde(default, deserialize_with = "nullable")]
    pub updated: String,
    #[serde(default, deserialize_with = "nullable")]
    pub creator: Creator,
    #[serde(default, deserialize_with = "nullable")]
    pub comments: Vec<Comment>,
}

/// One node of a reply tree. Owns its replies outright.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Comment {
    #[serde(rename = "comment_id", default, deserialize_with = "identifier")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
    #[serde(default, deserialize_with = "nullable")]
    pub depth: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub deleted: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub edited: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub num_replies: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub likes: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub dislikes: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub my_reaction: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub created: String,
    #[serde(default, deserialize_with = "nullable")]
    pub updated: String,
    #[serde(default, deserialize_with = "nullable")]
    pub creator: Creator,
    #[serde(default, deserialize_with = "nullable")]
    pub replies: Vec<Comment>,
}

impl Comment {
    /// Claims replies but none came back with it.
    pub fn is_truncated(&self) -> bool {
        self.num_replies > 0 && self.replies.is_empty()
    }
}

/// True if any comment in the forest, at any depth, is truncated.
pub fn has_truncated_replies(comments: &[Comment]) -> bool {
    comments
        .iter()
        .any(|c| c.is_truncated() || has_truncated_replies(&c.replies))
}

/// Treats `null` like an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{Error, Unexpected};

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Err(D::Error::invalid_type(
            Unexpected::Bool(b),
            &"string or number",
        )),
        Some(Value::Array(_)) => Err(D::Error::invalid_type(
            Unexpected::Seq,
            &"string or number",
        )),
        Some(Value::Object(_)) => Err(D::Error::invalid_type(
            Unexpected::Map,
            &"string or number",
        )),
    }
}
