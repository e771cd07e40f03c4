use std::io::IsTerminal as _;
use std::process;

use clap::Parser as _;
use crossterm::style::Stylize as _;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = vis_comments::CliArgs::parse();

    if let Err(error) = vis_comments::run(args).await {
        let use_color = std::io::stderr().is_terminal();

        if use_color {
            eprintln!("{} {error}", "error:".bold().red());
        } else {
            eprintln!("error: {error}");
        }

        for (i, cause) in error.chain().skip(1).enumerate() {
            if i == 0 {
                eprintln!();
                if use_color {
                    eprintln!("{}", "because:".bold().red());
                } else {
                    eprintln!("because:");
                }
            }

            if use_color {
                eprintln!("{} {cause}", "-".bold().red());
            } else {
                eprintln!("- {cause}");
            }
        }

        process::exit(1);
    }
}
