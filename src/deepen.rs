use std::future::Future;

use anyhow::Context as _;
use serde_json::Value;

use crate::query::{self, GqlQuery, ResourceKind};
use crate::topic::{Topic, has_truncated_replies};

/// Reply depth of the first request.
pub const INITIAL_DEPTH: usize = 3;
/// Added to the depth after each truncated result.
pub const DEPTH_STEP: usize = 3;
/// Deepest request ever issued.
pub const MAX_DEPTH: usize = 12;

/// Executes a query descriptor and hands back the decoded `data` object.
pub trait Transport {
    fn execute(&self, query: &GqlQuery) -> impl Future<Output = anyhow::Result<Value>>;
}

/// What a single round of the fetch loop observed.
#[derive(Debug)]
enum State {
    Requesting(usize),
    Evaluating { depth: usize, topics: Vec<Topic> },
    Done(Vec<Topic>),
    Exhausted(Vec<Topic>),
}

/// Fetches every topic on a visualization, deepening the reply nesting until
/// no comment claims replies it did not deliver.
///
/// Returns an empty list when the visualization itself is not found. Once
/// [`MAX_DEPTH`] has been requested the last result is returned even if some
/// subtree is still cut short.
pub async fn fetch_topics<T: Transport>(
    transport: &T,
    kind: ResourceKind,
    id: &str,
    author: Option<&str>,
) -> anyhow::Result<Vec<Topic>> {
    fetch_topics_with(transport, kind, id, author, |_| {}).await
}

/// Same as [`fetch_topics`], reporting each depth before it is requested.
pub async fn fetch_topics_with<T, F>(
    transport: &T,
    kind: ResourceKind,
    id: &str,
    author: Option<&str>,
    mut on_round: F,
) -> anyhow::Result<Vec<Topic>>
where
    T: Transport,
    F: FnMut(usize),
{
    let mut state = State::Requesting(INITIAL_DEPTH);
    loop {
        state = match state {
            State::Requesting(depth) => {
                on_round(depth);
                tracing::debug!(%kind, id, depth, "requesting topics");
                let q = query::build(kind, id, author, depth);
                let data = transport.execute(&q).await?;
                match extract_topics(data, kind)
                    .with_context(|| format!("decode {kind} topics for {id}"))?
                {
                    Some(topics) => State::Evaluating { depth, topics },
                    None => {
                        tracing::info!(%kind, id, "visualization not found");
                        State::Done(Vec::new())
                    }
                }
            }
            State::Evaluating { depth, topics } => {
                let truncated = topics.iter().any(|t| has_truncated_replies(&t.comments));
                if !truncated {
                    tracing::info!(
                        %kind,
                        id,
                        depth,
                        topics = topics.len(),
                        "comment tree complete"
                    );
                    State::Done(topics)
                } else if depth + DEPTH_STEP > MAX_DEPTH {
                    State::Exhausted(topics)
                } else {
                    State::Requesting(depth + DEPTH_STEP)
                }
            }
            State::Done(topics) => return Ok(topics),
            State::Exhausted(topics) => {
                tracing::warn!(
                    %kind,
                    id,
                    max_depth = MAX_DEPTH,
                    "reply tree still truncated at maximum depth; showing what was fetched"
                );
                return Ok(topics);
            }
        };
    }
}

/// Pulls the topic list out of `data.<kind>[0].topics`.
///
/// `None` means the visualization is absent from the response.
fn extract_topics(mut data: Value, kind: ResourceKind) -> anyhow::Result<Option<Vec<Topic>>> {
    let mut item = match data.get_mut(kind.field()).map(Value::take) {
        Some(Value::Array(items)) => match items.into_iter().next() {
            Some(item) => item,
            None => return Ok(None),
        },
        Some(Value::Null) | None => return Ok(None),
        Some(other) => anyhow::bail!("expected a list under `{kind}`, got {other}"),
    };
    if !item.is_object() {
        anyhow::bail!("expected an object in `{kind}`, got {item}");
    }
    match item.get_mut("topics").map(Value::take) {
        None | Some(Value::Null) => Ok(Some(Vec::new())),
        Some(topics) => Ok(Some(serde_json::from_value(topics)?)),
    }
}
