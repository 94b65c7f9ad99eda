use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};

/// Open-ended extension payload carried by items the widget never inspects.
pub type Extra =
  BTreeMap<String, serde_json::Value>;

pub const DEFAULT_ITEM_TYPE: &str =
  "default";
pub const DEFAULT_ITEM_COLOR: &str =
  "bg-blue-500";
pub const DEFAULT_ALL_DAY_COLOR: &str =
  "bg-purple-500";

pub const GROUP_PALETTE: [&str; 10] = [
  "bg-pink-500",
  "bg-blue-500",
  "bg-green-500",
  "bg-orange-500",
  "bg-purple-500",
  "bg-yellow-500",
  "bg-red-500",
  "bg-indigo-500",
  "bg-teal-500",
  "bg-cyan-500"
];

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
  Day,
  #[default]
  Week,
  Month,
  Year
}

impl ViewMode {
  pub fn all() -> [Self; 4] {
    [
      Self::Day,
      Self::Week,
      Self::Month,
      Self::Year
    ]
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Day => "day",
      | Self::Week => "week",
      | Self::Month => "month",
      | Self::Year => "year"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "day" => Some(Self::Day),
      | "week" => Some(Self::Week),
      | "month" => Some(Self::Month),
      | "year" => Some(Self::Year),
      | _ => None
    }
  }

  pub fn is_time_bearing(
    self
  ) -> bool {
    matches!(self, Self::Day | Self::Week)
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
  #[default]
  Calendar,
  Timeline
}

impl DisplayMode {
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Calendar => "calendar",
      | Self::Timeline => "timeline"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "calendar" => {
        Some(Self::Calendar)
      }
      | "timeline" => {
        Some(Self::Timeline)
      }
      | _ => None
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct Group {
  pub id:        String,
  pub name:      String,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub role:      Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub color:     Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub avatar:    Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub parent_id: Option<String>
}

impl Group {
  pub fn new(
    id: impl Into<String>,
    name: impl Into<String>
  ) -> Self {
    Self {
      id:        id.into(),
      name:      name.into(),
      role:      None,
      color:     None,
      avatar:    None,
      parent_id: None
    }
  }

  pub fn initials(&self) -> String {
    self
      .name
      .split_whitespace()
      .filter_map(|part| {
        part.chars().next()
      })
      .collect()
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem<X = Extra> {
  pub id:          String,
  pub employee_id: String,
  pub title:       String,
  pub date:        NaiveDate,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub start_time:  Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub end_time:    Option<String>,
  #[serde(default)]
  pub all_day:     bool,
  #[serde(
    default,
    rename = "type",
    skip_serializing_if = "Option::is_none"
  )]
  pub item_type:   Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub color:       Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub notes:       Option<String>,
  #[serde(flatten)]
  pub extra:       X
}

impl<X: Default> ScheduleItem<X> {
  pub fn timed(
    id: impl Into<String>,
    employee_id: impl Into<String>,
    title: impl Into<String>,
    date: NaiveDate,
    start_time: &str,
    end_time: &str
  ) -> Self {
    Self {
      id: id.into(),
      employee_id: employee_id.into(),
      title: title.into(),
      date,
      start_time: Some(
        start_time.to_string()
      ),
      end_time: Some(
        end_time.to_string()
      ),
      all_day: false,
      item_type: None,
      color: None,
      notes: None,
      extra: X::default()
    }
  }

  pub fn all_day(
    id: impl Into<String>,
    employee_id: impl Into<String>,
    title: impl Into<String>,
    date: NaiveDate
  ) -> Self {
    Self {
      id: id.into(),
      employee_id: employee_id.into(),
      title: title.into(),
      date,
      start_time: None,
      end_time: None,
      all_day: true,
      item_type: None,
      color: None,
      notes: None,
      extra: X::default()
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub employee_id: Option<String>,
  pub date:        NaiveDate
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub employee_id: Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub date:        Option<NaiveDate>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub start_time:  Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub end_time:    Option<String>
}

impl ItemPatch {
  pub fn is_empty(&self) -> bool {
    self.employee_id.is_none()
      && self.date.is_none()
      && self.start_time.is_none()
      && self.end_time.is_none()
  }

  pub fn apply_to<X>(
    &self,
    item: &mut ScheduleItem<X>
  ) {
    if let Some(employee_id) =
      &self.employee_id
    {
      item.employee_id =
        employee_id.clone();
    }
    if let Some(date) = self.date {
      item.date = date;
    }
    if let Some(start_time) =
      &self.start_time
    {
      item.start_time =
        Some(start_time.clone());
    }
    if let Some(end_time) =
      &self.end_time
    {
      item.end_time =
        Some(end_time.clone());
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct ItemTypeStyle {
  pub label: String,
  pub color: String,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub icon:  Option<String>
}

impl ItemTypeStyle {
  fn new(
    label: &str,
    color: &str
  ) -> Self {
    Self {
      label: label.to_string(),
      color: color.to_string(),
      icon:  None
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct LegendEntry {
  pub label: String,
  pub color: String,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub icon:  Option<String>
}

pub fn default_item_types()
-> BTreeMap<String, ItemTypeStyle> {
  [
    (
      DEFAULT_ITEM_TYPE,
      ItemTypeStyle::new(
        "Event",
        "bg-blue-500"
      )
    ),
    (
      "meeting",
      ItemTypeStyle::new(
        "Meeting",
        "bg-green-500"
      )
    ),
    (
      "task",
      ItemTypeStyle::new(
        "Task",
        "bg-orange-500"
      )
    ),
    (
      "break",
      ItemTypeStyle::new(
        "Break",
        "bg-gray-500"
      )
    ),
    (
      "vacation",
      ItemTypeStyle::new(
        "Vacation",
        "bg-purple-500"
      )
    ),
    (
      "holiday",
      ItemTypeStyle::new(
        "Holiday",
        "bg-red-500"
      )
    ),
    (
      "sick",
      ItemTypeStyle::new(
        "Sick Leave",
        "bg-yellow-500"
      )
    )
  ]
  .into_iter()
  .map(|(key, style)| {
    (key.to_string(), style)
  })
  .collect()
}
