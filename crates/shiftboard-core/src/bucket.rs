use chrono::NaiveDate;
use shiftboard_shared::{
  Group,
  ScheduleItem
};

use crate::range::same_month;

pub fn items_for_group_and_date<
  'a,
  X
>(
  items: &'a [ScheduleItem<X>],
  group_id: &str,
  date: NaiveDate
) -> Vec<&'a ScheduleItem<X>> {
  items
    .iter()
    .filter(|item| {
      item.employee_id == group_id
        && item.date == date
    })
    .collect()
}

pub fn items_for_group_and_month<
  'a,
  X
>(
  items: &'a [ScheduleItem<X>],
  group_id: &str,
  month: NaiveDate
) -> Vec<&'a ScheduleItem<X>> {
  items
    .iter()
    .filter(|item| {
      item.employee_id == group_id
        && same_month(item.date, month)
    })
    .collect()
}

pub struct GroupedItem<'a, X> {
  pub group:       &'a Group,
  pub group_index: usize,
  pub item:        &'a ScheduleItem<X>
}

/// Items of every group on one date, group by group.
pub fn items_for_date<'a, X>(
  groups: &'a [Group],
  items: &'a [ScheduleItem<X>],
  date: NaiveDate
) -> Vec<GroupedItem<'a, X>> {
  groups
    .iter()
    .enumerate()
    .flat_map(|(group_index, group)| {
      items_for_group_and_date(
        items, &group.id, date
      )
      .into_iter()
      .map(move |item| GroupedItem {
        group,
        group_index,
        item
      })
    })
    .collect()
}

pub fn items_for_month<'a, X>(
  groups: &'a [Group],
  items: &'a [ScheduleItem<X>],
  month: NaiveDate
) -> Vec<GroupedItem<'a, X>> {
  groups
    .iter()
    .enumerate()
    .flat_map(|(group_index, group)| {
      items_for_group_and_month(
        items, &group.id, month
      )
      .into_iter()
      .map(move |item| GroupedItem {
        group,
        group_index,
        item
      })
    })
    .collect()
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

  fn sample() -> (Vec<Group>, Vec<ScheduleItem>)
  {
    let groups = vec![
      Group::new("1", "John Doe"),
      Group::new("2", "Jane Smith"),
    ];
    let items = vec![
      ScheduleItem::timed(
        "a",
        "2",
        "Design Review",
        date(2025, 11, 9),
        "14:00",
        "15:30"
      ),
      ScheduleItem::timed(
        "b",
        "1",
        "Standup",
        date(2025, 11, 9),
        "09:00",
        "10:00"
      ),
      ScheduleItem::timed(
        "c",
        "1",
        "Code Review",
        date(2025, 11, 10),
        "10:00",
        "11:00"
      ),
      ScheduleItem::all_day(
        "d",
        "ghost",
        "Orphan",
        date(2025, 11, 9)
      ),
      ScheduleItem::all_day(
        "e",
        "1",
        "Holiday",
        date(2025, 12, 1)
      ),
    ];
    (groups, items)
  }

  #[test]
  fn group_and_date_filter_in_input_order()
  {
    let (_, items) = sample();
    let found = items_for_group_and_date(
      &items,
      "1",
      date(2025, 11, 9)
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "b");
  }

  #[test]
  fn month_bucket_matches_year_and_month()
  {
    let (_, items) = sample();
    let november =
      items_for_group_and_month(
        &items,
        "1",
        date(2025, 11, 1)
      );
    let ids = november
      .iter()
      .map(|item| item.id.as_str())
      .collect::<Vec<_>>();
    assert_eq!(ids, vec!["b", "c"]);

    assert!(
      items_for_group_and_month(
        &items,
        "1",
        date(2024, 11, 1)
      )
      .is_empty()
    );
  }

  #[test]
  fn unknown_groups_are_not_drawn() {
    let (groups, items) = sample();
    let found = items_for_date(
      &groups,
      &items,
      date(2025, 11, 9)
    );
    let ids = found
      .iter()
      .map(|entry| {
        (
          entry.item.id.as_str(),
          entry.group.name.as_str(),
          entry.group_index
        )
      })
      .collect::<Vec<_>>();
    assert_eq!(
      ids,
      vec![
        ("b", "John Doe", 0),
        ("a", "Jane Smith", 1)
      ]
    );
  }
}
