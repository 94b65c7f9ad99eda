use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use shiftboard_shared::{DisplayMode, ViewMode};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

fn parse_view(s: &str) -> anyhow::Result<ViewMode> {
    ViewMode::from_key(s).ok_or_else(|| anyhow!("expected day, week, month or year, got: {s}"))
}

fn parse_display(s: &str) -> anyhow::Result<DisplayMode> {
    DisplayMode::from_key(s).ok_or_else(|| anyhow!("expected calendar or timeline, got: {s}"))
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "shiftboard",
    version,
    about = "Shiftboard: group schedule calendar and timeline",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "set",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub overrides: Vec<KeyVal>,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render the schedule for a period.
    Show(ShowArgs),
    /// Print the overlap lane of every item of one group on one day.
    Lanes(LanesArgs),
    /// Drag an item onto a timeline position and print the proposed change.
    Move(MoveArgs),
    /// Print the draft a "new item" request would hand to the host.
    Create(CreateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    #[arg(long)]
    pub date: Option<NaiveDate>,

    #[arg(long, value_parser = clap::builder::ValueParser::new(parse_view))]
    pub view: Option<ViewMode>,

    #[arg(long, value_parser = clap::builder::ValueParser::new(parse_display))]
    pub display: Option<DisplayMode>,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[arg(long)]
    pub data: PathBuf,

    #[command(flatten)]
    pub view: ViewArgs,

    #[arg(long)]
    pub locale: Option<String>,

    /// Periods to step from the reference date; negative goes back.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub step: i32,

    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LanesArgs {
    #[arg(long)]
    pub data: PathBuf,

    #[arg(long)]
    pub group: String,

    #[arg(long)]
    pub date: NaiveDate,
}

#[derive(Args, Debug, Clone)]
pub struct MoveArgs {
    #[arg(long)]
    pub data: PathBuf,

    #[arg(long)]
    pub item: String,

    #[arg(long)]
    pub group: String,

    /// Horizontal pointer position across the row, from 0 to 1.
    #[arg(long)]
    pub fraction: f64,

    #[command(flatten)]
    pub view: ViewArgs,

    #[arg(long)]
    pub apply: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub group: Option<String>,

    #[arg(long)]
    pub date: Option<NaiveDate>,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
