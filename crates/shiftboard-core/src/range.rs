use chrono::{
  Datelike,
  Duration,
  NaiveDate,
  Weekday
};
use shiftboard_shared::{
  DisplayMode,
  ViewMode
};

use crate::i18n::Language;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Direction {
  Prev,
  Next
}

impl Direction {
  fn step(self) -> i64 {
    match self {
      | Self::Prev => -1,
      | Self::Next => 1
    }
  }
}

pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

pub fn last_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  let (next_year, next_month) =
    if month >= 12 {
      (year.saturating_add(1), 1_u32)
    } else {
      (year, month + 1)
    };
  add_days(
    first_day_of_month(
      next_year, next_month
    ),
    -1
  )
}

pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  last_day_of_month(year, month).day()
}

pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

pub fn start_of_week(
  day: NaiveDate
) -> NaiveDate {
  let diff = day
    .weekday()
    .num_days_from_monday()
    as i64;
  add_days(day, -diff)
}

pub fn shift_months(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  let mut year = date.year();
  let mut month =
    date.month() as i32 + months;

  while month < 1 {
    month += 12;
    year = year.saturating_sub(1);
  }
  while month > 12 {
    month -= 12;
    year = year.saturating_add(1);
  }

  let month = month as u32;
  let day = date
    .day()
    .min(days_in_month(year, month));
  NaiveDate::from_ymd_opt(
    year, month, day
  )
  .unwrap_or(date)
}

pub fn shift_years(
  date: NaiveDate,
  years: i32
) -> NaiveDate {
  shift_months(
    date,
    years.saturating_mul(12)
  )
}

pub fn navigate(
  current: NaiveDate,
  view: ViewMode,
  direction: Direction
) -> NaiveDate {
  let step = direction.step();
  match view {
    | ViewMode::Day => {
      add_days(current, step)
    }
    | ViewMode::Week => {
      add_days(current, step * 7)
    }
    | ViewMode::Month => {
      shift_months(current, step as i32)
    }
    | ViewMode::Year => {
      shift_years(current, step as i32)
    }
  }
}

fn days_between(
  start: NaiveDate,
  end: NaiveDate
) -> Vec<NaiveDate> {
  start
    .iter_days()
    .take_while(|day| *day <= end)
    .collect()
}

/// Dates drawn for a view. Year views yield the first of each month.
pub fn date_range(
  view: ViewMode,
  display: DisplayMode,
  reference: NaiveDate
) -> Vec<NaiveDate> {
  if display == DisplayMode::Timeline
    && view == ViewMode::Day
  {
    return vec![reference];
  }

  match view {
    | ViewMode::Day => vec![reference],
    | ViewMode::Week => {
      let start =
        start_of_week(reference);
      (0..7)
        .map(|offset| {
          add_days(start, offset)
        })
        .collect()
    }
    | ViewMode::Month => {
      days_between(
        first_day_of_month(
          reference.year(),
          reference.month()
        ),
        last_day_of_month(
          reference.year(),
          reference.month()
        )
      )
    }
    | ViewMode::Year => {
      (1..=12)
        .map(|month| {
          first_day_of_month(
            reference.year(),
            month
          )
        })
        .collect()
    }
  }
}

/// Whole Monday-anchored weeks covering the reference month.
pub fn month_grid(
  reference: NaiveDate
) -> Vec<NaiveDate> {
  let first = first_day_of_month(
    reference.year(),
    reference.month()
  );
  let last = last_day_of_month(
    reference.year(),
    reference.month()
  );
  let grid_start = start_of_week(first);
  let grid_end =
    add_days(start_of_week(last), 6);
  days_between(grid_start, grid_end)
}

pub fn is_weekend(day: NaiveDate) -> bool {
  matches!(
    day.weekday(),
    Weekday::Sat | Weekday::Sun
  )
}

pub fn same_month(
  a: NaiveDate,
  b: NaiveDate
) -> bool {
  a.year() == b.year()
    && a.month() == b.month()
}

pub fn range_label(
  view: ViewMode,
  reference: NaiveDate,
  language: Language
) -> String {
  match view {
    | ViewMode::Day => {
      format!(
        "{}, {:02}. {} {}",
        language
          .weekday_name(reference.weekday()),
        reference.day(),
        language
          .month_name(reference.month()),
        reference.year()
      )
    }
    | ViewMode::Week => {
      let start =
        start_of_week(reference);
      let end = add_days(start, 6);
      format!(
        "{:02}. {} - {:02}. {} {}",
        start.day(),
        language
          .month_abbrev(start.month()),
        end.day(),
        language.month_abbrev(end.month()),
        end.year()
      )
    }
    | ViewMode::Month => {
      format!(
        "{} {}",
        language
          .month_name(reference.month()),
        reference.year()
      )
    }
    | ViewMode::Year => {
      reference.year().to_string()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn week_from_wednesday_runs_monday_to_sunday()
  {
    let range = date_range(
      ViewMode::Week,
      DisplayMode::Calendar,
      date(2025, 11, 12)
    );

    assert_eq!(range.len(), 7);
    assert_eq!(range[0], date(2025, 11, 10));
    assert_eq!(range[0].weekday(), Weekday::Mon);
    assert_eq!(range[6], date(2025, 11, 16));
    assert_eq!(range[6].weekday(), Weekday::Sun);
  }

  #[test]
  fn week_from_sunday_looks_back() {
    let range = date_range(
      ViewMode::Week,
      DisplayMode::Timeline,
      date(2025, 11, 16)
    );
    assert_eq!(range[0], date(2025, 11, 10));
  }

  #[test]
  fn month_lengths_are_exact() {
    let june = date_range(
      ViewMode::Month,
      DisplayMode::Calendar,
      date(2025, 6, 18)
    );
    assert_eq!(june.len(), 30);
    assert_eq!(june[0], date(2025, 6, 1));
    assert_eq!(june[29], date(2025, 6, 30));

    let leap = date_range(
      ViewMode::Month,
      DisplayMode::Calendar,
      date(2024, 2, 10)
    );
    assert_eq!(leap.len(), 29);

    let plain = date_range(
      ViewMode::Month,
      DisplayMode::Calendar,
      date(2025, 2, 10)
    );
    assert_eq!(plain.len(), 28);
  }

  #[test]
  fn year_yields_first_of_each_month() {
    let range = date_range(
      ViewMode::Year,
      DisplayMode::Calendar,
      date(2025, 7, 4)
    );
    assert_eq!(range.len(), 12);
    assert!(range.iter().enumerate().all(
      |(index, day)| {
        day.day() == 1
          && day.month() == index as u32 + 1
          && day.year() == 2025
      }
    ));
  }

  #[test]
  fn day_is_single_in_both_displays() {
    let reference = date(2025, 11, 9);
    for display in [
      DisplayMode::Calendar,
      DisplayMode::Timeline
    ] {
      assert_eq!(
        date_range(
          ViewMode::Day,
          display,
          reference
        ),
        vec![reference]
      );
    }
  }

  #[test]
  fn month_grid_pads_to_full_weeks() {
    // November 2025 starts on a Saturday.
    let grid = month_grid(date(2025, 11, 20));
    assert_eq!(grid.len() % 7, 0);
    assert_eq!(grid[0], date(2025, 10, 27));
    assert_eq!(
      grid.last().copied(),
      Some(date(2025, 11, 30))
    );
    assert_eq!(grid.len(), 35);
  }

  #[test]
  fn navigation_clamps_month_ends() {
    assert_eq!(
      navigate(
        date(2025, 1, 31),
        ViewMode::Month,
        Direction::Next
      ),
      date(2025, 2, 28)
    );
    assert_eq!(
      navigate(
        date(2024, 2, 29),
        ViewMode::Year,
        Direction::Next
      ),
      date(2025, 2, 28)
    );
    assert_eq!(
      navigate(
        date(2025, 1, 15),
        ViewMode::Month,
        Direction::Prev
      ),
      date(2024, 12, 15)
    );
    assert_eq!(
      navigate(
        date(2025, 11, 12),
        ViewMode::Week,
        Direction::Prev
      ),
      date(2025, 11, 5)
    );
    assert_eq!(
      navigate(
        date(2025, 12, 31),
        ViewMode::Day,
        Direction::Next
      ),
      date(2026, 1, 1)
    );
  }

  #[test]
  fn labels_use_language_names() {
    let reference = date(2025, 11, 12);
    assert_eq!(
      range_label(
        ViewMode::Day,
        reference,
        Language::En
      ),
      "Wednesday, 12. November 2025"
    );
    assert_eq!(
      range_label(
        ViewMode::Week,
        reference,
        Language::De
      ),
      "10. Nov - 16. Nov 2025"
    );
    assert_eq!(
      range_label(
        ViewMode::Month,
        date(2025, 3, 1),
        Language::De
      ),
      "März 2025"
    );
    assert_eq!(
      range_label(
        ViewMode::Year,
        reference,
        Language::Fr
      ),
      "2025"
    );
  }
}
