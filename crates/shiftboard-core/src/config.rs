use std::collections::BTreeMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use chrono::{
  NaiveDate,
  Timelike,
  Utc
};
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};
use shiftboard_shared::{
  DisplayMode,
  LegendEntry,
  ViewMode,
  default_item_types
};
use tracing::{
  debug,
  info,
  warn
};

use crate::i18n::{
  Language,
  Translations,
  resolve_translations
};
use crate::style::ItemTypes;
use crate::time::{
  DEFAULT_SNAP_MINUTES,
  MINUTES_PER_DAY
};
use crate::widget::Interaction;

pub const CONFIG_ENV_VAR: &str =
  "SHIFTBOARD_CONFIG";
pub const TIMEZONE_ENV_VAR: &str =
  "SHIFTBOARD_TIMEZONE";
const CONFIG_FILE_NAME: &str =
  "shiftboard.toml";
const DEFAULT_LOCALE: &str = "en";
const DEFAULT_GROUP_LABEL: &str =
  "Employee";
const DEFAULT_ITEM_LABEL: &str = "Item";

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct LayoutConfig {
  pub lane_height_px:        u32,
  pub lane_offset_px:        u32,
  pub min_row_height_px:     u32,
  pub month_cell_limit:      usize,
  pub year_card_limit:       usize,
  pub compact_row_height_px: u32
}

impl Default for LayoutConfig {
  fn default() -> Self {
    Self {
      lane_height_px:        56,
      lane_offset_px:        8,
      min_row_height_px:     80,
      month_cell_limit:      3,
      year_card_limit:       5,
      compact_row_height_px: 36
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct WidgetConfig {
  pub view:              ViewMode,
  pub display:           DisplayMode,
  pub locale:            String,
  pub timezone:          Option<String>,
  pub show_controls:     bool,
  pub show_legend:       bool,
  pub can_create:        bool,
  pub can_edit:          bool,
  pub show_group_role:   bool,
  pub show_group_avatar: bool,
  pub group_label:       String,
  pub item_label:        String,
  pub snap_minutes:      u32,
  pub layout:            LayoutConfig,
  pub item_types:        ItemTypes,
  pub legend:            Option<Vec<LegendEntry>>,
  pub translations:      BTreeMap<String, String>
}

impl Default for WidgetConfig {
  fn default() -> Self {
    Self {
      view:              ViewMode::Week,
      display:           DisplayMode::Calendar,
      locale:            DEFAULT_LOCALE
        .to_string(),
      timezone:          None,
      show_controls:     true,
      show_legend:       true,
      can_create:        true,
      can_edit:          true,
      show_group_role:   true,
      show_group_avatar: true,
      group_label:       DEFAULT_GROUP_LABEL
        .to_string(),
      item_label:        DEFAULT_ITEM_LABEL
        .to_string(),
      snap_minutes:      DEFAULT_SNAP_MINUTES,
      layout:            LayoutConfig::default(),
      item_types:        default_item_types(),
      legend:            None,
      translations:      BTreeMap::new()
    }
  }
}

impl WidgetConfig {
  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) =
      resolve_config_path(config_override)?
    else {
      warn!(
        "no shiftboard.toml found; using \
         defaults"
      );
      return Ok(Self::default());
    };

    info!(config = %path.display(), "loading widget config");
    Self::load_file(&path)
  }

  pub fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let path = expand_tilde(path);
    let text = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    Self::from_toml(&text).with_context(
      || {
        format!(
          "failed to parse {}",
          path.display()
        )
      }
    )
  }

  pub fn from_toml(
    text: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<WidgetConfig>(text)
        .context("invalid widget config")?;
    sanitize_widget_config(&mut config);
    debug!(
      view = config.view.as_key(),
      display = config.display.as_key(),
      locale = %config.locale,
      timezone = ?config.timezone,
      "loaded widget config"
    );
    Ok(config)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (key, value) in overrides {
      debug!(key = %key, value = %value, "applying override");
      self.apply_override(
        key.trim(),
        value.trim()
      )?;
    }
    sanitize_widget_config(self);
    Ok(())
  }

  fn apply_override(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    if let Some(name) =
      key.strip_prefix("translations.")
    {
      self.translations.insert(
        name.to_string(),
        value.to_string()
      );
      return Ok(());
    }

    match key {
      | "view" => {
        self.view = ViewMode::from_key(
          value
        )
        .ok_or_else(|| {
          anyhow!(
            "unknown view: {value}"
          )
        })?;
      }
      | "display" => {
        self.display =
          DisplayMode::from_key(value)
            .ok_or_else(|| {
              anyhow!(
                "unknown display: {value}"
              )
            })?;
      }
      | "locale" => {
        self.locale = value.to_string()
      }
      | "timezone" => {
        self.timezone = if value.is_empty()
        {
          None
        } else {
          Some(value.to_string())
        };
      }
      | "show_controls" => {
        self.show_controls =
          parse_bool(value)
      }
      | "show_legend" => {
        self.show_legend =
          parse_bool(value)
      }
      | "can_create" => {
        self.can_create = parse_bool(value)
      }
      | "can_edit" => {
        self.can_edit = parse_bool(value)
      }
      | "show_group_role" => {
        self.show_group_role =
          parse_bool(value)
      }
      | "show_group_avatar" => {
        self.show_group_avatar =
          parse_bool(value)
      }
      | "group_label" => {
        self.group_label =
          value.to_string()
      }
      | "item_label" => {
        self.item_label = value.to_string()
      }
      | "snap_minutes" => {
        self.snap_minutes = value
          .parse()
          .with_context(|| {
            format!(
              "invalid snap_minutes: \
               {value}"
            )
          })?;
      }
      | _ => {
        return Err(anyhow!(
          "unknown config key: {key}"
        ));
      }
    }
    Ok(())
  }

  pub fn language(&self) -> Language {
    Language::from_locale(&self.locale)
  }

  pub fn translations(
    &self
  ) -> Translations {
    resolve_translations(
      &self.locale,
      &self.translations
    )
  }

  pub fn interaction(
    &self
  ) -> Interaction {
    Interaction {
      can_create:   self.can_create,
      can_edit:     self.can_edit,
      snap_minutes: self.snap_minutes
    }
  }
}

pub fn sanitize_widget_config(
  config: &mut WidgetConfig
) {
  if config.locale.trim().is_empty() {
    config.locale =
      DEFAULT_LOCALE.to_string();
  }

  if config.group_label.trim().is_empty()
  {
    config.group_label =
      DEFAULT_GROUP_LABEL.to_string();
  }

  if config.item_label.trim().is_empty() {
    config.item_label =
      DEFAULT_ITEM_LABEL.to_string();
  }

  if config.snap_minutes == 0
    || MINUTES_PER_DAY
      % config.snap_minutes
      != 0
  {
    warn!(
      snap_minutes = config.snap_minutes,
      "snap interval must divide a day; \
       using default"
    );
    config.snap_minutes =
      DEFAULT_SNAP_MINUTES;
  }

  if config
    .timezone
    .as_deref()
    .is_some_and(|raw| {
      raw.trim().is_empty()
    })
  {
    config.timezone = None;
  }

  let defaults = LayoutConfig::default();
  let layout = &mut config.layout;
  if layout.lane_height_px == 0 {
    layout.lane_height_px =
      defaults.lane_height_px;
  }
  if layout.min_row_height_px == 0 {
    layout.min_row_height_px =
      defaults.min_row_height_px;
  }
  if layout.compact_row_height_px == 0 {
    layout.compact_row_height_px =
      defaults.compact_row_height_px;
  }
  if layout.month_cell_limit == 0 {
    layout.month_cell_limit =
      defaults.month_cell_limit;
  }
  if layout.year_card_limit == 0 {
    layout.year_card_limit =
      defaults.year_card_limit;
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_config_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(raw) =
    std::env::var(CONFIG_ENV_VAR)
  {
    if raw == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(raw)));
  }

  let config_dir = dirs::config_dir()
    .ok_or_else(|| {
      anyhow!(
        "cannot determine config \
         directory"
      )
    })?;
  let candidate = config_dir
    .join("shiftboard")
    .join(CONFIG_FILE_NAME);
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

/// Timezone used to decide what "today" and "now" are.
pub fn resolve_timezone(
  config: &WidgetConfig
) -> Tz {
  let from_env =
    std::env::var(TIMEZONE_ENV_VAR).ok();
  pick_timezone(
    from_env.as_deref(),
    config.timezone.as_deref()
  )
}

fn pick_timezone(
  from_env: Option<&str>,
  from_config: Option<&str>
) -> Tz {
  if let Some(raw) = from_env
    && let Some(tz) =
      parse_timezone(raw, TIMEZONE_ENV_VAR)
  {
    return tz;
  }

  if let Some(raw) = from_config
    && let Some(tz) =
      parse_timezone(raw, CONFIG_FILE_NAME)
  {
    return tz;
  }

  chrono_tz::UTC
}

fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => Some(tz),
    | Err(error) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %error,
        "invalid timezone id"
      );
      None
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct Clock {
  pub today:       NaiveDate,
  pub now_minutes: u32
}

impl Clock {
  pub fn now(timezone: Tz) -> Self {
    let local =
      Utc::now().with_timezone(&timezone);
    Self {
      today:       local.date_naive(),
      now_minutes: local.hour() * 60
        + local.minute()
    }
  }

  pub fn fixed(
    today: NaiveDate,
    now_minutes: u32
  ) -> Self {
    Self {
      today,
      now_minutes: now_minutes
        .min(MINUTES_PER_DAY - 1)
    }
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_file_yields_defaults() {
    let config = WidgetConfig::from_toml("")
      .expect("empty config");
    assert_eq!(config, WidgetConfig::default());
    assert_eq!(config.snap_minutes, 15);
    assert_eq!(config.layout.lane_height_px, 56);
    assert_eq!(config.item_types.len(), 7);
  }

  #[test]
  fn partial_file_keeps_other_defaults() {
    let config = WidgetConfig::from_toml(
      r#"
view = "month"
display = "timeline"
locale = "de-DE"
can_edit = false

[layout]
month_cell_limit = 4

[translations]
today = "Heute!"
"#
    )
    .expect("parse config");

    assert_eq!(config.view, ViewMode::Month);
    assert_eq!(
      config.display,
      DisplayMode::Timeline
    );
    assert!(!config.can_edit);
    assert!(config.can_create);
    assert_eq!(config.layout.month_cell_limit, 4);
    assert_eq!(config.layout.year_card_limit, 5);
    assert_eq!(config.language(), Language::De);
    assert_eq!(config.translations().today, "Heute!");
    assert_eq!(config.translations().week, "Woche");
  }

  #[test]
  fn sanitize_repairs_bad_values() {
    let config = WidgetConfig::from_toml(
      r#"
locale = "  "
group_label = ""
snap_minutes = 7
timezone = ""

[layout]
lane_height_px = 0
year_card_limit = 0
"#
    )
    .expect("parse config");

    assert_eq!(config.locale, "en");
    assert_eq!(config.group_label, "Employee");
    assert_eq!(config.snap_minutes, 15);
    assert_eq!(config.timezone, None);
    assert_eq!(config.layout.lane_height_px, 56);
    assert_eq!(config.layout.year_card_limit, 5);
  }

  #[test]
  fn invalid_toml_is_an_error() {
    assert!(
      WidgetConfig::from_toml("view = ")
        .is_err()
    );
    assert!(
      WidgetConfig::from_toml(
        "view = \"decade\""
      )
      .is_err()
    );
  }

  #[test]
  fn overrides_apply_after_file() {
    let mut config = WidgetConfig::default();
    config
      .apply_overrides([
        ("view".to_string(), "day".to_string()),
        (
          "display".to_string(),
          "Timeline".to_string()
        ),
        (
          "can_create".to_string(),
          "off".to_string()
        ),
        (
          "snap_minutes".to_string(),
          "30".to_string()
        ),
        (
          "translations.today".to_string(),
          "Now".to_string()
        )
      ])
      .expect("overrides");

    assert_eq!(config.view, ViewMode::Day);
    assert_eq!(
      config.display,
      DisplayMode::Timeline
    );
    assert!(!config.interaction().can_create);
    assert_eq!(config.interaction().snap_minutes, 30);
    assert_eq!(config.translations().today, "Now");
  }

  #[test]
  fn unknown_override_key_fails() {
    let mut config = WidgetConfig::default();
    let result = config.apply_overrides([(
      "colour".to_string(),
      "on".to_string()
    )]);
    assert!(result.is_err());

    let result = config.apply_overrides([(
      "snap_minutes".to_string(),
      "soon".to_string()
    )]);
    assert!(result.is_err());
  }

  #[test]
  fn env_timezone_wins_and_invalid_falls_back() {
    assert_eq!(
      pick_timezone(
        Some("Europe/Berlin"),
        Some("America/New_York")
      ),
      chrono_tz::Europe::Berlin
    );
    assert_eq!(
      pick_timezone(
        Some("Mars/Olympus"),
        Some("America/New_York")
      ),
      chrono_tz::America::New_York
    );
    assert_eq!(
      pick_timezone(None, Some("nope")),
      chrono_tz::UTC
    );
    assert_eq!(
      pick_timezone(None, None),
      chrono_tz::UTC
    );
  }

  #[test]
  fn fixed_clock_stays_inside_the_day() {
    let today = NaiveDate::from_ymd_opt(
      2025, 11, 12
    )
    .expect("valid date");
    assert_eq!(
      Clock::fixed(today, 5000).now_minutes,
      1439
    );
  }

  #[test]
  fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    let missing =
      dir.path().join("missing.toml");
    assert!(
      WidgetConfig::load(Some(&missing))
        .is_err()
    );
  }
}
