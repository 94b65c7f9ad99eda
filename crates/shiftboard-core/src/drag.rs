use chrono::NaiveDate;
use serde::Serialize;
use shiftboard_shared::{
  ItemPatch,
  ScheduleItem
};

use crate::time::{
  MINUTES_PER_DAY,
  TimeSpan,
  calculate_item_position,
  format_minutes,
  snap_within_day
};

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct HeldItem {
  pub id:          String,
  pub employee_id: String,
  pub title:       String,
  pub all_day:     bool,
  pub start_time:  Option<String>,
  pub end_time:    Option<String>
}

impl HeldItem {
  pub fn from_item<X>(
    item: &ScheduleItem<X>
  ) -> Self {
    Self {
      id:          item.id.clone(),
      employee_id: item
        .employee_id
        .clone(),
      title:       item.title.clone(),
      all_day:     item.all_day,
      start_time:  item.start_time.clone(),
      end_time:    item.end_time.clone()
    }
  }
}

impl TimeSpan for HeldItem {
  fn is_all_day(&self) -> bool {
    self.all_day
  }

  fn start_time(&self) -> Option<&str> {
    self.start_time.as_deref()
  }

  fn end_time(&self) -> Option<&str> {
    self.end_time.as_deref()
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct DropTarget {
  /// `None` for calendar cells, which are not tied to a group.
  pub group_id: Option<String>,
  pub date:     NaiveDate,
  pub minute:   Option<u32>
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct PointerSlot {
  pub day_index: usize,
  pub date:      NaiveDate,
  pub minute:    u32
}

/// Map a horizontal pointer fraction across a timeline row to a day
/// and an unsnapped minute of that day.
pub fn resolve_pointer(
  fraction: f64,
  dates: &[NaiveDate]
) -> Option<PointerSlot> {
  if dates.is_empty() {
    return None;
  }

  let total_minutes =
    dates.len() as u64
      * u64::from(MINUTES_PER_DAY);
  let fraction = if fraction.is_nan() {
    0.0
  } else {
    fraction.clamp(0.0, 1.0)
  };
  let minutes = ((fraction
    * total_minutes as f64)
    .floor() as u64)
    .min(total_minutes - 1);

  let day_index = (minutes
    / u64::from(MINUTES_PER_DAY))
    as usize;
  let minute = (minutes
    % u64::from(MINUTES_PER_DAY))
    as u32;

  Some(PointerSlot {
    day_index,
    date: dates[day_index],
    minute
  })
}

pub fn snap_minute(
  minute: u32,
  snap_minutes: u32
) -> u32 {
  snap_within_day(minute, snap_minutes)
}

fn duration_minutes<T: TimeSpan>(
  item: &T
) -> Option<u32> {
  let duration =
    calculate_item_position(item, 24)
      .duration;
  if duration.is_finite()
    && duration >= 0.0
  {
    Some(duration as u32)
  } else {
    None
  }
}

/// Field changes for dropping `held` on a group, date and time.
pub fn plan_relocation(
  held: &HeldItem,
  group_id: &str,
  date: NaiveDate,
  minute: Option<u32>
) -> ItemPatch {
  let mut patch = ItemPatch {
    employee_id: Some(
      group_id.to_string()
    ),
    date: Some(date),
    ..ItemPatch::default()
  };

  let Some(start) = minute else {
    return patch;
  };
  if held.all_day {
    return patch;
  }

  let start = start % MINUTES_PER_DAY;
  patch.start_time =
    Some(format_minutes(start));
  match duration_minutes(held) {
    | Some(duration) => {
      patch.end_time = Some(
        format_minutes(
          start
            + duration.min(MINUTES_PER_DAY)
        )
      );
    }
    | None => {
      tracing::warn!(
        item = %held.id,
        "item has malformed times; \
         keeping its end time"
      );
    }
  }
  patch
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct DropPreview {
  pub left:  f64,
  pub width: f64,
  pub label: String
}

pub fn drop_preview(
  held: &HeldItem,
  target: &DropTarget,
  dates: &[NaiveDate]
) -> Option<DropPreview> {
  let start = target.minute?;
  if dates.is_empty() {
    return None;
  }

  let total_minutes = dates.len() as f64
    * f64::from(MINUTES_PER_DAY);
  let day_index = dates
    .iter()
    .position(|day| *day == target.date)
    .unwrap_or(0);
  let absolute = day_index as f64
    * f64::from(MINUTES_PER_DAY)
    + f64::from(start);

  let duration =
    calculate_item_position(held, 24)
      .duration
      .max(15.0);

  let label = if held.all_day {
    held.title.clone()
  } else {
    let end = duration_minutes(held)
      .map(|duration| {
        format_minutes(start + duration)
      })
      .unwrap_or_else(|| {
        format_minutes(start)
      });
    format!(
      "{} • {}-{}",
      held.title,
      format_minutes(start),
      end
    )
  };

  Some(DropPreview {
    left: absolute / total_minutes
      * 100.0,
    width: duration / total_minutes
      * 100.0,
    label
  })
}
