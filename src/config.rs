//! Command line and environment configuration.

use crate::avatar::DEFAULT_AVATAR_BASE;
use crate::github::{DEFAULT_ENDPOINT, MAX_PAGE_SIZE};
use crate::render::{Style, Theme};
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "charts/data.json";
pub const DEFAULT_RADIAL_OUTPUT: &str = "charts/org_contributions.svg";
pub const DEFAULT_BAR_OUTPUT: &str = "charts/org_contributions_bar.svg";
pub const DEFAULT_MAX_ORGS: u16 = 8;

#[derive(Parser, Debug)]
#[command(
    name = "org-contributions",
    version,
    about = "Tally pull requests per organization and draw them as SVG"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch recent pull requests and write the per-organization tally
    Collect(CollectArgs),
    /// Draw the tally as an SVG
    Render(RenderArgs),
}

#[derive(Args, Debug)]
pub struct CollectArgs {
    /// GitHub login whose pull requests are tallied
    #[arg(long, env = "ORG_CONTRIB_USER", value_parser = NonEmptyStringValueParser::new())]
    user: String,

    /// Bearer token for the GraphQL API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[arg(long, env = "ORG_CONTRIB_API_URL", default_value = DEFAULT_ENDPOINT)]
    api_url: String,

    /// Pull requests fetched, newest first. Only one page is ever requested.
    #[arg(
        long,
        env = "ORG_CONTRIB_PAGE_SIZE",
        default_value_t = MAX_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_SIZE as i64)
    )]
    page_size: u32,

    /// Where the tally is written
    #[arg(long, env = "ORG_CONTRIB_DATA", default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// GitHub login drawn at the center; always excluded from the ranking
    #[arg(long, env = "ORG_CONTRIB_USER", value_parser = NonEmptyStringValueParser::new())]
    user: String,

    /// Tally file produced by `collect`
    #[arg(long, env = "ORG_CONTRIB_DATA", default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    #[arg(long, env = "ORG_CONTRIB_STYLE", value_enum, default_value_t = Style::Radial)]
    style: Style,

    #[arg(long, env = "ORG_CONTRIB_THEME", value_enum, default_value_t = Theme::Dark)]
    theme: Theme,

    /// Organizations to hide, comma separated
    #[arg(long, env = "ORG_CONTRIB_EXCLUDE", value_delimiter = ',')]
    exclude: Vec<String>,

    #[arg(
        long,
        env = "ORG_CONTRIB_MAX_ORGS",
        default_value_t = DEFAULT_MAX_ORGS,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    max_orgs: u16,

    /// Stack closed pull requests on the bars
    #[arg(
        long,
        env = "ORG_CONTRIB_SHOW_CLOSED",
        action = ArgAction::Set,
        default_value_t = true
    )]
    show_closed: bool,

    #[arg(long, env = "ORG_CONTRIB_AVATAR_BASE", default_value = DEFAULT_AVATAR_BASE)]
    avatar_base: String,

    /// Defaults to a per-style file under charts/
    #[arg(long, env = "ORG_CONTRIB_OUTPUT")]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectConfig {
    pub user: String,
    pub token: Option<String>,
    pub api_url: String,
    pub page_size: u32,
    pub data: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub user: String,
    pub data: PathBuf,
    pub style: Style,
    pub theme: Theme,
    pub exclude: Vec<String>,
    pub max_orgs: usize,
    pub show_closed: bool,
    pub avatar_base: String,
    pub output: PathBuf,
}

impl From<CollectArgs> for CollectConfig {
    fn from(args: CollectArgs) -> Self {
        Self {
            user: args.user,
            token: args.token,
            api_url: args.api_url,
            page_size: args.page_size,
            data: args.data,
        }
    }
}

impl From<RenderArgs> for RenderConfig {
    fn from(args: RenderArgs) -> Self {
        let mut exclude: Vec<String> = args
            .exclude
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        if !exclude.contains(&args.user) {
            exclude.push(args.user.clone());
        }

        let output = args.output.unwrap_or_else(|| {
            PathBuf::from(match args.style {
                Style::Radial => DEFAULT_RADIAL_OUTPUT,
                Style::Bar => DEFAULT_BAR_OUTPUT,
            })
        });

        Self {
            user: args.user,
            data: args.data,
            style: args.style,
            theme: args.theme,
            exclude,
            max_orgs: args.max_orgs as usize,
            show_closed: args.show_closed,
            avatar_base: args.avatar_base,
            output,
        }
    }
}
