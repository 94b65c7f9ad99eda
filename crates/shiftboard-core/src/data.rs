use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{
  Context,
  anyhow,
  bail
};
use serde::{
  Deserialize,
  Serialize
};
use shiftboard_shared::{
  Group,
  ScheduleItem
};
use tracing::{
  info,
  warn
};

use crate::time::{
  TimeSpan,
  parse_time
};

/// Groups and items as a host hands them to the widget.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct ScheduleData {
  #[serde(default)]
  pub groups: Vec<Group>,
  #[serde(default)]
  pub items:  Vec<ScheduleItem>
}

impl ScheduleData {
  #[tracing::instrument]
  pub fn load(
    path: &Path
  ) -> anyhow::Result<Self> {
    let text = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let data = Self::from_json(&text)
      .with_context(|| {
        format!(
          "failed to parse {}",
          path.display()
        )
      })?;

    info!(
      groups = data.groups.len(),
      items = data.items.len(),
      "loaded schedule data"
    );
    for issue in data.check() {
      warn!(issue = %issue, "schedule data issue");
    }
    Ok(data)
  }

  pub fn from_json(
    text: &str
  ) -> anyhow::Result<Self> {
    let value: serde_json::Value =
      serde_json::from_str(text)
        .context("invalid schedule data")?;
    if !value.is_object() {
      bail!(
        "schedule data must be an object \
         with groups and items"
      );
    }
    serde_json::from_value(value)
      .context("invalid schedule data")
  }

  pub fn group(
    &self,
    id: &str
  ) -> Option<&Group> {
    self
      .groups
      .iter()
      .find(|group| group.id == id)
  }

  pub fn item(
    &self,
    id: &str
  ) -> anyhow::Result<&ScheduleItem> {
    self
      .items
      .iter()
      .find(|item| item.id == id)
      .ok_or_else(|| {
        anyhow!("no item with id {id}")
      })
  }

  /// Problems the widget tolerates but a host probably wants to know about.
  pub fn check(&self) -> Vec<String> {
    let mut issues = Vec::new();

    let mut seen = BTreeSet::new();
    for group in &self.groups {
      if !seen.insert(group.id.as_str()) {
        issues.push(format!(
          "duplicate group id {}",
          group.id
        ));
      }
    }

    let mut item_ids = BTreeSet::new();
    for item in &self.items {
      if !item_ids.insert(item.id.as_str()) {
        issues.push(format!(
          "duplicate item id {}",
          item.id
        ));
      }
      if !seen.contains(item.employee_id.as_str())
      {
        issues.push(format!(
          "item {} references unknown group \
           {}; it will not be drawn",
          item.id, item.employee_id
        ));
      }
      if item.is_all_day() {
        continue;
      }
      for raw in [
        item.start_time(),
        item.end_time()
      ]
      .into_iter()
      .flatten()
      {
        if let Err(err) = parse_time(raw) {
          issues.push(format!(
            "item {}: {err}",
            item.id
          ));
        }
      }
    }

    issues
  }
}
