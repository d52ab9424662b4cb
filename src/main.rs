mod avatar;
mod config;
mod error;
mod github;
mod pipeline;
mod rank;
mod render;
mod tally;

use clap::Parser;
use config::{Cli, Command, CollectConfig, RenderConfig};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ORG_CONTRIB_LOG";

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| EnvFilter::new("org_contributions=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Collect(args) => {
            let config = CollectConfig::from(args);
            let tally = pipeline::collect(&config).await?;
            println!(
                "Tallied {} organizations into {}",
                tally.len(),
                config.data.display()
            );
        }
        Command::Render(args) => {
            let config = RenderConfig::from(args);
            let summary = pipeline::render(&config).await?;
            println!(
                "Generated {:?} chart for {} orgs ({} avatars) at {}",
                config.style,
                summary.organizations,
                summary.avatars,
                config.output.display()
            );
        }
    }

    Ok(())
}
