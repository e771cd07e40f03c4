use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context as _, anyhow};
use regex::Regex;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;
use url::Url;

use crate::deepen::Transport;
use crate::query::GqlQuery;

static VERSION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/v\d+$").expect("static version pattern"));

/// Maps a REST API root such as `https://api.novem.io/v1` to its GraphQL endpoint.
pub fn gql_endpoint(api_root: &str) -> anyhow::Result<Url> {
    let trimmed = api_root.trim_end_matches('/');
    let endpoint = VERSION_SUFFIX.replace(trimmed, "/gql");
    Url::parse(&endpoint).with_context(|| format!("invalid api root {api_root}"))
}

/// GraphQL-over-HTTP transport.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl Fetcher {
    pub fn new(user_agent: &str, endpoint: Url, token: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            client,
            endpoint,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// POSTs `query` and returns the raw response document.
    pub async fn post_query(&self, query: &GqlQuery) -> anyhow::Result<Value> {
        let mut backoff = Duration::from_millis(250);
        let max_attempts = 5usize;

        for attempt in 1..=max_attempts {
            let mut req = self.client.post(self.endpoint.clone()).json(query);
            if let Some(token) = &self.token {
                req = req.bearer_auth(token);
            }
            let resp = req
                .send()
                .await
                .with_context(|| format!("POST {}", self.endpoint))?;

            let status = resp.status();
            if status.is_success() {
                return resp.json().await.context("decode graphql response");
            }

            if status.as_u16() == 429 || status.as_u16() == 503 {
                if attempt == max_attempts {
                    tracing::warn!(%status, attempt, "throttled; giving up");
                    break;
                }
                let wait = retry_after_duration(resp.headers()).unwrap_or(backoff);
                tracing::warn!(
                    %status,
                    attempt,
                    wait_ms = wait.as_millis(),
                    "throttled; backing off"
                );
                tokio::time::sleep(wait).await;
                backoff = (backoff * 2).min(Duration::from_secs(10));
                continue;
            }

            return Err(anyhow!("POST {} failed with status {}", self.endpoint, status));
        }

        Err(anyhow!("POST {} failed after retries", self.endpoint))
    }
}

impl Transport for Fetcher {
    async fn execute(&self, query: &GqlQuery) -> anyhow::Result<Value> {
        let document = self.post_query(query).await?;
        into_data(document)
    }
}

/// Splits a GraphQL response into its `data`, failing on a non-empty `errors` list.
fn into_data(mut document: Value) -> anyhow::Result<Value> {
    if !document.is_object() {
        anyhow::bail!("graphql response is not an object");
    }
    match document.get("errors") {
        None | Some(Value::Null) => {}
        Some(Value::Array(errors)) if errors.is_empty() => {}
        Some(errors) => anyhow::bail!("GraphQL error: {errors}"),
    }
    match document.get_mut("data").map(Value::take) {
        Some(Value::Null) | None => Ok(Value::Object(Default::default())),
        Some(data) => Ok(data),
    }
}

fn retry_after_duration(headers: &HeaderMap) -> Option<Duration> {
    let v = headers.get(RETRY_AFTER)?;
    let s = v.to_str().ok()?.trim();
    let seconds: u64 = s.parse().ok()?;
    Some(Duration::from_secs(seconds))
}
