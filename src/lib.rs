mod ansi;
mod cli;
mod deepen;
mod fetcher;
mod progress;
mod query;
mod render;
mod timestamp;
mod topic;
mod wrap;

use anyhow::Context as _;
use cli::Args;

pub use ansi::{strip as strip_ansi, visible_width};
pub use cli::{Args as CliArgs, ColorMode, DEFAULT_API_ROOT, ProgressMode};
pub use deepen::{DEPTH_STEP, INITIAL_DEPTH, MAX_DEPTH, Transport, fetch_topics};
pub use fetcher::{Fetcher, gql_endpoint};
pub use query::{GqlQuery, ResourceKind};
pub use render::{Renderer, render_topics};
pub use topic::{Comment, Creator, Topic, has_truncated_replies};
pub use wrap::wrap_text;

/// Fetches the discussion described by `args` and prints it to stdout.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let out = render_output(&args).await?;
    println!("{out}");
    Ok(())
}

/// Everything [`run`] does except the final print.
pub async fn render_output(args: &Args) -> anyhow::Result<String> {
    use std::io::IsTerminal as _;

    let progress_enabled = match args.progress {
        ProgressMode::Always => true,
        ProgressMode::Never => false,
        ProgressMode::Auto => std::io::stderr().is_terminal(),
    };
    let color = match args.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    };

    let endpoint = gql_endpoint(&args.api_root)?;
    tracing::debug!(%endpoint, "using graphql endpoint");
    let fetcher = Fetcher::new(&args.user_agent, endpoint, args.token.clone())?;

    let progress = progress::Progress::new(progress_enabled);
    let fetched = deepen::fetch_topics_with(
        &fetcher,
        args.kind,
        &args.id,
        args.author.as_deref(),
        |depth| progress.request(depth),
    )
    .await
    .with_context(|| format!("fetch comments for {} {}", args.kind, args.id));

    let out = match fetched {
        Ok(topics) if args.raw => {
            progress.set_stage("encoding");
            serde_json::to_string_pretty(&topics).context("encode topics")
        }
        Ok(topics) => {
            progress.set_stage("rendering");
            Ok(render_topics(&topics, &args.me, color))
        }
        Err(e) => Err(e),
    };
    progress.finish();
    out
}

/// Fetches the full discussion through `transport` and renders it.
///
/// `me` is highlighted wherever it appears as an author.
pub async fn comments<T: Transport>(
    transport: &T,
    kind: ResourceKind,
    id: &str,
    author: Option<&str>,
    me: &str,
    color: bool,
) -> anyhow::Result<String> {
    let topics = fetch_topics(transport, kind, id, author).await?;
    Ok(render_topics(&topics, me, color))
}
