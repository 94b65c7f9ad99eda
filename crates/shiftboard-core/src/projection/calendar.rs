use chrono::{
  Datelike,
  NaiveDate
};
use serde::Serialize;
use shiftboard_shared::ViewMode;

use super::{
  ItemChip,
  ProjectionContext,
  item_chip,
  more_label
};
use crate::bucket::{
  GroupedItem,
  items_for_date,
  items_for_month
};
use crate::range::{
  is_weekend,
  month_grid,
  range_label,
  same_month
};
use crate::widget::WidgetState;

#[derive(Debug, Clone, Serialize)]
pub enum CalendarBody {
  Month {
    weekdays: Vec<String>,
    cells:    Vec<MonthCell>
  },
  Week {
    columns: Vec<DayColumn>
  },
  Day(DayList),
  Year {
    months: Vec<MonthCard>
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthCell {
  pub date:             NaiveDate,
  pub day:              u32,
  pub in_current_month: bool,
  pub is_weekend:       bool,
  pub is_today:         bool,
  pub is_drop_target:   bool,
  pub items:            Vec<ItemChip>,
  pub hidden:           usize,
  pub more_label:       Option<String>
}

#[derive(Debug, Clone, Serialize)]
pub struct DayColumn {
  pub date:           NaiveDate,
  pub weekday:        String,
  pub label:          String,
  pub is_today:       bool,
  pub is_drop_target: bool,
  pub items:          Vec<ItemChip>,
  pub add_label:      Option<String>
}

#[derive(Debug, Clone, Serialize)]
pub struct DayList {
  pub date:          NaiveDate,
  pub label:         String,
  pub is_today:      bool,
  pub items:         Vec<ItemChip>,
  pub empty_message: Option<String>
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthCard {
  pub month:         NaiveDate,
  pub name:          String,
  pub items:         Vec<ItemChip>,
  pub hidden:        usize,
  pub more_label:    Option<String>,
  pub empty_message: Option<String>
}

pub(super) fn project<X>(
  state: &WidgetState,
  ctx: &ProjectionContext<'_, X>,
  dates: &[NaiveDate]
) -> CalendarBody {
  let reference = state.view.reference;
  let drop_date = state
    .drag
    .target()
    .map(|target| target.date);

  match state.view.view {
    | ViewMode::Month => {
      month(ctx, reference, drop_date)
    }
    | ViewMode::Week => {
      CalendarBody::Week {
        columns: dates
          .iter()
          .map(|date| {
            day_column(ctx, *date, drop_date)
          })
          .collect()
      }
    }
    | ViewMode::Day => {
      CalendarBody::Day(day_list(
        ctx, reference
      ))
    }
    | ViewMode::Year => {
      CalendarBody::Year {
        months: dates
          .iter()
          .map(|month| {
            month_card(ctx, *month)
          })
          .collect()
      }
    }
  }
}

fn chips<X>(
  found: &[GroupedItem<'_, X>],
  ctx: &ProjectionContext<'_, X>
) -> Vec<ItemChip> {
  found
    .iter()
    .map(|entry| {
      item_chip(entry.item, entry.group, ctx)
    })
    .collect()
}

fn month<X>(
  ctx: &ProjectionContext<'_, X>,
  reference: NaiveDate,
  drop_date: Option<NaiveDate>
) -> CalendarBody {
  let limit =
    ctx.config.layout.month_cell_limit;
  let grid = month_grid(reference);

  let weekdays = grid
    .iter()
    .take(7)
    .map(|day| {
      ctx
        .language
        .weekday_abbrev(day.weekday())
        .to_string()
    })
    .collect();

  let cells = grid
    .iter()
    .map(|date| {
      let found = items_for_date(
        ctx.groups, ctx.items, *date
      );
      let hidden =
        found.len().saturating_sub(limit);
      let shown = &found
        [..found.len().min(limit)];
      MonthCell {
        date: *date,
        day: date.day(),
        in_current_month: same_month(
          *date, reference
        ),
        is_weekend: is_weekend(*date),
        is_today: *date == ctx.clock.today,
        is_drop_target: drop_date
          == Some(*date),
        items: chips(shown, ctx),
        hidden,
        more_label: more_label(
          hidden,
          ctx.translations
        )
      }
    })
    .collect();

  CalendarBody::Month { weekdays, cells }
}

fn day_column<X>(
  ctx: &ProjectionContext<'_, X>,
  date: NaiveDate,
  drop_date: Option<NaiveDate>
) -> DayColumn {
  let found = items_for_date(
    ctx.groups, ctx.items, date
  );
  DayColumn {
    date,
    weekday: ctx
      .language
      .weekday_abbrev(date.weekday())
      .to_string(),
    label: format!(
      "{}. {}",
      date.day(),
      ctx.language.month_abbrev(date.month())
    ),
    is_today: date == ctx.clock.today,
    is_drop_target: drop_date == Some(date),
    items: chips(&found, ctx),
    add_label: ctx
      .config
      .can_create
      .then(|| ctx.translations.add.to_string())
  }
}

fn day_list<X>(
  ctx: &ProjectionContext<'_, X>,
  date: NaiveDate
) -> DayList {
  let found = items_for_date(
    ctx.groups, ctx.items, date
  );
  let empty_message = found
    .is_empty()
    .then(|| {
      ctx
        .translations
        .no_items_for_day
        .to_string()
    });
  DayList {
    date,
    label: range_label(
      ViewMode::Day,
      date,
      ctx.language
    ),
    is_today: date == ctx.clock.today,
    items: chips(&found, ctx),
    empty_message
  }
}

fn month_card<X>(
  ctx: &ProjectionContext<'_, X>,
  month: NaiveDate
) -> MonthCard {
  let limit =
    ctx.config.layout.year_card_limit;
  let found = items_for_month(
    ctx.groups, ctx.items, month
  );
  let hidden =
    found.len().saturating_sub(limit);

  MonthCard {
    month,
    name: ctx
      .language
      .month_name(month.month())
      .to_string(),
    items: chips(
      &found[..found.len().min(limit)],
      ctx
    ),
    hidden,
    more_label: more_label(
      hidden,
      ctx.translations
    ),
    empty_message: found.is_empty().then(
      || ctx.translations.no_items.to_string()
    )
  }
}
