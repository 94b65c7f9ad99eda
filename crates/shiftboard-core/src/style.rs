use std::collections::BTreeMap;

use shiftboard_shared::{
  DEFAULT_ALL_DAY_COLOR,
  DEFAULT_ITEM_COLOR,
  DEFAULT_ITEM_TYPE,
  GROUP_PALETTE,
  Group,
  ItemTypeStyle,
  LegendEntry,
  ScheduleItem
};

use crate::i18n::Translations;

pub type ItemTypes =
  BTreeMap<String, ItemTypeStyle>;

fn type_key<X>(
  item: &ScheduleItem<X>
) -> &str {
  item
    .item_type
    .as_deref()
    .unwrap_or(DEFAULT_ITEM_TYPE)
}

fn configured_color<'a, X>(
  item: &'a ScheduleItem<X>,
  item_types: &'a ItemTypes
) -> Option<&'a str> {
  item.color.as_deref().or_else(|| {
    item_types
      .get(type_key(item))
      .map(|style| style.color.as_str())
  })
}

pub fn item_color<X>(
  item: &ScheduleItem<X>,
  item_types: &ItemTypes
) -> String {
  configured_color(item, item_types)
    .unwrap_or_else(|| {
      tracing::debug!(
        item = %item.id,
        item_type = type_key(item),
        "no style for item; using default color"
      );
      DEFAULT_ITEM_COLOR
    })
    .to_string()
}

pub fn timeline_item_color<X>(
  item: &ScheduleItem<X>,
  item_types: &ItemTypes
) -> String {
  if item.all_day {
    configured_color(item, item_types)
      .unwrap_or(DEFAULT_ALL_DAY_COLOR)
      .to_string()
  } else {
    item_color(item, item_types)
  }
}

pub fn item_type_label<X>(
  item: &ScheduleItem<X>,
  item_types: &ItemTypes,
  translations: &Translations
) -> String {
  item_types
    .get(type_key(item))
    .map(|style| style.label.as_str())
    .or_else(|| {
      translations
        .item_type_label(type_key(item))
    })
    .unwrap_or(translations.event.as_ref())
    .to_string()
}

pub fn group_color(
  group: &Group,
  index: usize
) -> String {
  group
    .color
    .clone()
    .unwrap_or_else(|| {
      GROUP_PALETTE
        [index % GROUP_PALETTE.len()]
      .to_string()
    })
}

/// Explicit legend entries win; otherwise every item type is listed.
pub fn legend_entries(
  legend: Option<&[LegendEntry]>,
  item_types: &ItemTypes
) -> Vec<LegendEntry> {
  if let Some(entries) = legend {
    return entries.to_vec();
  }

  item_types
    .values()
    .map(|style| LegendEntry {
      label: style.label.clone(),
      color: style.color.clone(),
      icon:  style.icon.clone()
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use shiftboard_shared::default_item_types;

  use super::*;
  use crate::i18n::Language;

  fn item() -> ScheduleItem {
    ScheduleItem::timed(
      "1",
      "1",
      "Standup",
      NaiveDate::from_ymd_opt(2025, 11, 9)
        .expect("valid date"),
      "09:00",
      "10:00"
    )
  }

  #[test]
  fn color_prefers_item_then_type_then_default()
  {
    let types = default_item_types();
    let mut standup = item();

    assert_eq!(
      item_color(&standup, &types),
      "bg-blue-500"
    );

    standup.item_type =
      Some("meeting".to_string());
    assert_eq!(
      item_color(&standup, &types),
      "bg-green-500"
    );

    standup.color =
      Some("bg-lime-300".to_string());
    assert_eq!(
      item_color(&standup, &types),
      "bg-lime-300"
    );

    standup.color = None;
    standup.item_type =
      Some("offsite".to_string());
    assert_eq!(
      item_color(&standup, &types),
      DEFAULT_ITEM_COLOR
    );
  }

  #[test]
  fn all_day_timeline_fallback_is_purple()
  {
    let mut vacation = item();
    vacation.all_day = true;
    vacation.item_type =
      Some("unknown".to_string());

    assert_eq!(
      timeline_item_color(
        &vacation,
        &ItemTypes::new()
      ),
      DEFAULT_ALL_DAY_COLOR
    );
    assert_eq!(
      item_color(
        &vacation,
        &ItemTypes::new()
      ),
      DEFAULT_ITEM_COLOR
    );
  }

  #[test]
  fn unknown_type_label_uses_translation()
  {
    let mut standup = item();
    standup.item_type =
      Some("offsite".to_string());
    let table = Language::De.table();

    assert_eq!(
      item_type_label(
        &standup,
        &default_item_types(),
        &table
      ),
      "Ereignis"
    );
  }

  #[test]
  fn group_palette_cycles() {
    let plain = Group::new("x", "X");
    assert_eq!(
      group_color(&plain, 0),
      "bg-pink-500"
    );
    assert_eq!(
      group_color(&plain, 11),
      "bg-blue-500"
    );

    let mut colored = plain.clone();
    colored.color =
      Some("bg-black".to_string());
    assert_eq!(
      group_color(&colored, 3),
      "bg-black"
    );
  }

  #[test]
  fn legend_defaults_to_item_types() {
    let types = default_item_types();
    let legend =
      legend_entries(None, &types);
    assert_eq!(legend.len(), types.len());

    let custom = vec![LegendEntry {
      label: "On call".to_string(),
      color: "bg-red-700".to_string(),
      icon:  None
    }];
    assert_eq!(
      legend_entries(
        Some(custom.as_slice()),
        &types
      ),
      custom
    );
  }
}
