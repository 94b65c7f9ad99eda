pub mod bucket;
pub mod cli;
pub mod commands;
pub mod config;
pub mod data;
pub mod drag;
pub mod i18n;
pub mod layout;
pub mod projection;
pub mod range;
pub mod render;
pub mod style;
pub mod time;
pub mod widget;

use std::ffi::OsString;

use clap::Parser;
use tracing::{
  debug,
  info
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting shiftboard CLI"
  );
  debug!(?cli.overrides, "config overrides");

  let mut cfg = config::WidgetConfig::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    cli
      .overrides
      .into_iter()
      .map(|kv| (kv.key, kv.value))
  )?;

  let timezone =
    config::resolve_timezone(&cfg);
  let clock = config::Clock::now(timezone);
  debug!(
    %timezone,
    today = %clock.today,
    now_minutes = clock.now_minutes,
    "resolved clock"
  );

  let mut renderer =
    render::Renderer::new(
      &cfg,
      !cli.no_color
    );

  commands::dispatch(
    &cfg,
    clock,
    &mut renderer,
    cli.command
  )?;

  info!("done");
  Ok(())
}
