use clap::ValueEnum;
use serde::Serialize;
use serde_json::{Map, Value};

/// Visualization family a discussion hangs off. Doubles as the GraphQL root field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Plots,
    Grids,
    Mails,
    Jobs,
}

impl ResourceKind {
    pub fn field(self) -> &'static str {
        match self {
            ResourceKind::Plots => "plots",
            ResourceKind::Grids => "grids",
            ResourceKind::Mails => "mails",
            ResourceKind::Jobs => "jobs",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}

/// A textual GraphQL query plus its named variables, ready for a transport.
#[derive(Debug, Clone, Serialize)]
pub struct GqlQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub variables: Map<String, Value>,
}

impl GqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
        }
    }

    pub fn var(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(name.to_string(), value.into());
        self
    }
}

const COMMENT_FIELDS: &str = "
    comment_id
    slug
    message
    depth
    deleted
    edited
    num_replies
    likes
    dislikes
    my_reaction
    created
    updated
    creator { username }";

const TOPIC_FIELDS: &str = "
      topic_id
      slug
      message
      audience
      status
      num_comments
      likes
      dislikes
      my_reaction
      edited
      created
      updated
      creator { username }";

/// Comment selection with `depth` levels of nested `replies` below the root.
pub fn comment_selection(depth: usize) -> String {
    let mut selection = COMMENT_FIELDS.to_string();
    for _ in 0..depth {
        selection = format!("{COMMENT_FIELDS}\n    replies {{{selection}\n    }}");
    }
    selection
}

/// Builds the topics query for `kind`, nesting comment replies `depth` levels.
pub fn topics_query(kind: ResourceKind, depth: usize) -> String {
    let field = kind.field();
    let comments = comment_selection(depth);
    format!(
        "query GetTopics($id: ID!, $author: String) {{
  {field}(id: $id, author: $author) {{
    topics {{{TOPIC_FIELDS}
      comments {{{comments}
      }}
    }}
  }}
}}
"
    )
}

/// The full descriptor for one round of the topic fetch.
pub fn build(kind: ResourceKind, id: &str, author: Option<&str>, depth: usize) -> GqlQuery {
    let query = GqlQuery::new(topics_query(kind, depth)).var("id", id);
    match author {
        Some(author) => query.var("author", author),
        None => query,
    }
}
