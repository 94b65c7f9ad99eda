use anyhow::{
  Context,
  anyhow
};
use regex::Regex;
use shiftboard_shared::ScheduleItem;

pub const MINUTES_PER_DAY: u32 = 1440;
pub const HOURS_PER_DAY: u32 = 24;
pub const DEFAULT_SNAP_MINUTES: u32 = 15;
pub const MIDNIGHT: &str = "00:00";

pub trait TimeSpan {
  fn is_all_day(&self) -> bool;
  fn start_time(&self) -> Option<&str>;
  fn end_time(&self) -> Option<&str>;
}

impl<X> TimeSpan for ScheduleItem<X> {
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

impl<T: TimeSpan + ?Sized> TimeSpan
  for &T
{
  fn is_all_day(&self) -> bool {
    (**self).is_all_day()
  }

  fn start_time(&self) -> Option<&str> {
    (**self).start_time()
  }

  fn end_time(&self) -> Option<&str> {
    (**self).end_time()
  }
}

pub fn start_or_midnight<T: TimeSpan>(
  item: &T
) -> &str {
  item.start_time().unwrap_or(MIDNIGHT)
}

pub fn end_or_midnight<T: TimeSpan>(
  item: &T
) -> &str {
  item.end_time().unwrap_or(MIDNIGHT)
}

/// Minutes since midnight for an `HH:MM` string.
///
/// Fail-soft: a missing or non-numeric part yields `NaN` instead of an
/// error, an empty part counts as zero (`"9:"` is 540), and the value is
/// not range checked. Use [`parse_time`] when a malformed string must be
/// reported.
pub fn time_to_minutes(raw: &str) -> f64 {
  let mut parts = raw.split(':');
  let hours =
    parts.next().and_then(lenient_number);
  let minutes =
    parts.next().and_then(lenient_number);

  match (hours, minutes) {
    | (Some(hours), Some(minutes)) => {
      hours * 60.0 + minutes
    }
    | _ => {
      tracing::debug!(
        time = %raw,
        "malformed time string"
      );
      f64::NAN
    }
  }
}

fn lenient_number(part: &str) -> Option<f64> {
  let part = part.trim();
  if part.is_empty() {
    return Some(0.0);
  }
  part.parse::<f64>().ok()
}

/// Strict counterpart of [`time_to_minutes`].
pub fn parse_time(
  raw: &str
) -> anyhow::Result<u32> {
  let clock_re = Regex::new(
    r"^(?P<hour>\d{1,2}):(?P<minute>\d{2})$"
  )
  .map_err(|e| {
    anyhow!(
      "internal regex compile failure: \
       {e}"
    )
  })?;
  let captures = clock_re
    .captures(raw.trim())
    .ok_or_else(|| {
      anyhow!(
        "expected HH:MM time, got: \
         {raw:?}"
      )
    })?;

  let hour = captures
    .name("hour")
    .map(|m| m.as_str())
    .ok_or_else(|| {
      anyhow!("missing hour in {raw:?}")
    })?
    .parse::<u32>()
    .with_context(|| {
      format!("invalid hour in {raw:?}")
    })?;
  let minute = captures
    .name("minute")
    .map(|m| m.as_str())
    .ok_or_else(|| {
      anyhow!(
        "missing minute in {raw:?}"
      )
    })?
    .parse::<u32>()
    .with_context(|| {
      format!(
        "invalid minute in {raw:?}"
      )
    })?;

  if hour >= HOURS_PER_DAY {
    return Err(anyhow!(
      "hour out of range in {raw:?}"
    ));
  }
  if minute >= 60 {
    return Err(anyhow!(
      "minute out of range in {raw:?}"
    ));
  }

  Ok(hour * 60 + minute)
}

pub fn format_minutes(
  minutes: u32
) -> String {
  let minutes = minutes % MINUTES_PER_DAY;
  format!(
    "{:02}:{:02}",
    minutes / 60,
    minutes % 60
  )
}

/// Nearest multiple of `interval`, ties rounding up.
pub fn snap_to_interval(
  minutes: u32,
  interval: u32
) -> u32 {
  if interval == 0 {
    return minutes;
  }
  let minutes = u64::from(minutes);
  let interval = u64::from(interval);
  let snapped = (2 * minutes + interval)
    / (2 * interval)
    * interval;
  u32::try_from(snapped).unwrap_or(u32::MAX)
}

pub fn snap_within_day(
  minute_of_day: u32,
  interval: u32
) -> u32 {
  let snapped = snap_to_interval(
    minute_of_day,
    interval
  );
  if snapped >= MINUTES_PER_DAY {
    MINUTES_PER_DAY
      - interval.clamp(1, MINUTES_PER_DAY)
  } else {
    snapped
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq,
)]
pub struct ItemPosition {
  pub left:          f64,
  pub width:         f64,
  pub start_minutes: f64,
  pub end_minutes:   f64,
  pub duration:      f64
}

impl ItemPosition {
  pub fn full_day() -> Self {
    let day = f64::from(MINUTES_PER_DAY);
    Self {
      left:          0.0,
      width:         100.0,
      start_minutes: 0.0,
      end_minutes:   day,
      duration:      day
    }
  }
}

/// Horizontal rectangle of an item inside a span of `total_hours`.
///
/// An end time numerically before the start is read as crossing
/// midnight. Missing times fall back to midnight, so an item with only
/// a start time runs until the end of its day.
pub fn calculate_item_position<
  T: TimeSpan
>(
  item: &T,
  total_hours: u32
) -> ItemPosition {
  if item.is_all_day() {
    return ItemPosition::full_day();
  }

  let start_minutes = time_to_minutes(
    start_or_midnight(item)
  );
  let end_minutes = time_to_minutes(
    end_or_midnight(item)
  );

  let mut duration =
    end_minutes - start_minutes;
  if duration < 0.0 {
    duration = f64::from(MINUTES_PER_DAY)
      - start_minutes
      + end_minutes;
  }

  let total_minutes =
    f64::from(total_hours) * 60.0;
  ItemPosition {
    left: start_minutes / total_minutes
      * 100.0,
    width: duration / total_minutes
      * 100.0,
    start_minutes,
    end_minutes,
    duration
  }
}

pub fn occupied_interval<T: TimeSpan>(
  item: &T
) -> (f64, f64) {
  let day = f64::from(MINUTES_PER_DAY);
  if item.is_all_day() {
    return (0.0, day);
  }

  let start = time_to_minutes(
    start_or_midnight(item)
  );
  let end = time_to_minutes(
    end_or_midnight(item)
  );
  if end < start {
    (start, day)
  } else {
    (start, end)
  }
}
