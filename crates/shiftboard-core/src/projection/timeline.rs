use chrono::{
  Datelike,
  NaiveDate
};
use serde::Serialize;
use shiftboard_shared::{
  Group,
  ScheduleItem,
  ViewMode
};

use super::{
  GroupBadge,
  ProjectionContext,
  group_badge,
  time_label
};
use crate::bucket::{
  items_for_group_and_date,
  items_for_group_and_month
};
use crate::drag::{
  DropPreview,
  drop_preview
};
use crate::layout::assign_lanes;
use crate::style::timeline_item_color;
use crate::time::{
  HOURS_PER_DAY,
  MINUTES_PER_DAY,
  calculate_item_position,
  format_minutes
};
use crate::widget::WidgetState;

const COMPACT_BELOW_MINUTES: f64 = 60.0;
const DAY_LABEL_MIN_MINUTES: f64 = 30.0;
const WEEK_LABEL_MIN_MINUTES: f64 = 180.0;
const WEEK_TICK_EVERY: u32 = 6;
const MIN_PREVIEW_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Serialize)]
pub struct TimelineBody {
  pub group_label: String,
  pub columns:     Vec<TimelineColumn>,
  pub ticks:       Vec<HourTick>,
  pub rows:        Vec<TimelineRow>,
  pub now_marker:  Option<f64>,
  pub now_label:   Option<String>
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineColumn {
  pub date:     NaiveDate,
  pub label:    String,
  pub is_today: bool
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct HourTick {
  pub day_index: usize,
  pub hour:      u32,
  pub label:     Option<String>,
  pub major:     bool
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineRow {
  pub group:          GroupBadge,
  pub min_height_px:  u32,
  pub is_drop_target: bool,
  pub bars:           Vec<TimelineBar>,
  pub drop_preview:   Option<DropPreview>
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineBar {
  pub id:         String,
  pub title:      String,
  pub color:      String,
  pub all_day:    bool,
  pub lane:       usize,
  pub left:       f64,
  pub width:      f64,
  pub top_px:     u32,
  pub compact:    bool,
  pub time_label: Option<String>,
  pub tooltip:    String,
  pub draggable:  bool
}

pub(super) fn project<X>(
  state: &WidgetState,
  ctx: &ProjectionContext<'_, X>,
  dates: &[NaiveDate]
) -> TimelineBody {
  let view = state.view.view;
  let columns = dates
    .iter()
    .map(|date| column(ctx, view, *date))
    .collect();

  let time_bearing = view.is_time_bearing();
  let rows = ctx
    .groups
    .iter()
    .enumerate()
    .map(|(index, group)| {
      if time_bearing {
        time_row(
          state, ctx, dates, group, index
        )
      } else {
        stacked_row(
          state, ctx, dates, group, index
        )
      }
    })
    .collect();

  let now_marker = if time_bearing {
    now_marker(
      dates,
      ctx.clock.today,
      ctx.clock.now_minutes
    )
  } else {
    None
  };

  TimelineBody {
    group_label: ctx
      .config
      .group_label
      .clone(),
    columns,
    ticks: if time_bearing {
      hour_ticks(view, dates.len())
    } else {
      Vec::new()
    },
    rows,
    now_label: now_marker.map(|_| {
      format_minutes(ctx.clock.now_minutes)
    }),
    now_marker
  }
}

fn column<X>(
  ctx: &ProjectionContext<'_, X>,
  view: ViewMode,
  date: NaiveDate
) -> TimelineColumn {
  let language = ctx.language;
  let label = match view {
    | ViewMode::Year => language
      .month_abbrev(date.month())
      .to_string(),
    | ViewMode::Month => format!(
      "{} {}",
      language
        .weekday_abbrev(date.weekday()),
      date.day()
    ),
    | ViewMode::Day | ViewMode::Week => {
      format!(
        "{}, {:02}.{:02}",
        language
          .weekday_abbrev(date.weekday()),
        date.day(),
        date.month()
      )
    }
  };

  TimelineColumn {
    date,
    label,
    is_today: view != ViewMode::Year
      && date == ctx.clock.today
  }
}

/// One tick per hour of every visible day; week views label every
/// sixth hour only.
pub fn hour_ticks(
  view: ViewMode,
  days: usize
) -> Vec<HourTick> {
  (0..days)
    .flat_map(|day_index| {
      (0..HOURS_PER_DAY).map(move |hour| {
        let major = view == ViewMode::Day
          || hour % WEEK_TICK_EVERY == 0;
        HourTick {
          day_index,
          hour,
          label: major
            .then(|| hour.to_string()),
          major
        }
      })
    })
    .collect()
}

/// Percent offset of the current-time line, if today is visible.
pub fn now_marker(
  dates: &[NaiveDate],
  today: NaiveDate,
  now_minutes: u32
) -> Option<f64> {
  let today_index = dates
    .iter()
    .position(|date| *date == today)?;
  let total = dates.len() as f64
    * f64::from(MINUTES_PER_DAY);
  let offset = today_index as f64
    * f64::from(MINUTES_PER_DAY)
    + f64::from(now_minutes);
  Some((offset / total * 100.0).clamp(0.0, 100.0))
}

fn time_row<X>(
  state: &WidgetState,
  ctx: &ProjectionContext<'_, X>,
  dates: &[NaiveDate],
  group: &Group,
  index: usize
) -> TimelineRow {
  let layout = &ctx.config.layout;
  let view = state.view.view;
  let days = dates.len().max(1) as f64;
  let total_minutes =
    days * f64::from(MINUTES_PER_DAY);

  let mut bars = Vec::new();
  for (day_index, date) in
    dates.iter().enumerate()
  {
    let day_items = items_for_group_and_date(
      ctx.items, &group.id, *date
    );
    let lanes = assign_lanes(&day_items);

    for (item, lane) in
      day_items.iter().zip(lanes)
    {
      let position =
        calculate_item_position(*item, 24);

      let (left, width) = if item.all_day
        && view == ViewMode::Week
      {
        (
          day_index as f64 / days * 100.0,
          100.0 / days
        )
      } else if view == ViewMode::Day {
        (position.left, position.width)
      } else {
        let offset = day_index as f64
          * f64::from(MINUTES_PER_DAY)
          + position.start_minutes;
        (
          offset / total_minutes * 100.0,
          position.duration / total_minutes
            * 100.0
        )
      };

      let label_min = if view == ViewMode::Day
      {
        DAY_LABEL_MIN_MINUTES
      } else {
        WEEK_LABEL_MIN_MINUTES
      };
      let caption = if item.all_day
        || position.duration >= label_min
      {
        Some(time_label(
          *item,
          ctx.translations
        ))
      } else {
        None
      };

      bars.push(bar(
        ctx,
        *item,
        Geometry {
          lane,
          left,
          width,
          top_px: lane as u32
            * layout.lane_height_px
            + layout.lane_offset_px,
          compact: !item.all_day
            && position.duration
              < COMPACT_BELOW_MINUTES
        },
        caption
      ));
    }
  }

  let min_height_px = bars
    .iter()
    .map(|bar| bar.lane)
    .max()
    .map_or(layout.min_row_height_px, |max| {
      layout.min_row_height_px.max(
        (max as u32 + 1)
          * layout.lane_height_px
      )
    });

  let is_drop_target =
    targets_group(state, group);
  let drop_preview = if is_drop_target {
    placeholder(state, dates)
  } else {
    None
  };

  TimelineRow {
    group: group_badge(group, index, ctx.config),
    min_height_px,
    is_drop_target,
    bars,
    drop_preview
  }
}

fn stacked_row<X>(
  state: &WidgetState,
  ctx: &ProjectionContext<'_, X>,
  dates: &[NaiveDate],
  group: &Group,
  index: usize
) -> TimelineRow {
  let layout = &ctx.config.layout;
  let year = state.view.view == ViewMode::Year;
  let columns = dates.len().max(1) as f64;

  let bars = dates
    .iter()
    .enumerate()
    .flat_map(|(column, date)| {
      let found = if year {
        items_for_group_and_month(
          ctx.items, &group.id, *date
        )
      } else {
        items_for_group_and_date(
          ctx.items, &group.id, *date
        )
      };
      found
        .into_iter()
        .map(move |item| (column, item))
    })
    .enumerate()
    .map(|(stack, (column, item))| {
      bar(
        ctx,
        item,
        Geometry {
          lane:    stack,
          left:    column as f64 / columns
            * 100.0,
          width:   100.0 / columns,
          top_px:  stack as u32
            * layout.compact_row_height_px
            + layout.lane_offset_px,
          compact: false
        },
        Some(time_label(item, ctx.translations))
      )
    })
    .collect::<Vec<_>>();

  let min_height_px = layout
    .min_row_height_px
    .max(
      bars.len() as u32
        * layout.compact_row_height_px
    );

  TimelineRow {
    group: group_badge(group, index, ctx.config),
    min_height_px,
    is_drop_target: targets_group(
      state, group
    ),
    bars,
    drop_preview: None
  }
}

struct Geometry {
  lane:    usize,
  left:    f64,
  width:   f64,
  top_px:  u32,
  compact: bool
}

fn bar<X>(
  ctx: &ProjectionContext<'_, X>,
  item: &ScheduleItem<X>,
  geometry: Geometry,
  caption: Option<String>
) -> TimelineBar {
  let tooltip = format!(
    "{} ({})",
    item.title,
    time_label(item, ctx.translations)
  );

  TimelineBar {
    id: item.id.clone(),
    title: item.title.clone(),
    color: timeline_item_color(
      item,
      &ctx.config.item_types
    ),
    all_day: item.all_day,
    lane: geometry.lane,
    left: geometry.left,
    width: geometry.width,
    top_px: geometry.top_px,
    compact: geometry.compact,
    time_label: caption,
    tooltip,
    draggable: ctx.config.can_edit
  }
}

fn targets_group(
  state: &WidgetState,
  group: &Group
) -> bool {
  state
    .drag
    .target()
    .and_then(|target| {
      target.group_id.as_deref()
    })
    == Some(group.id.as_str())
}

fn placeholder(
  state: &WidgetState,
  dates: &[NaiveDate]
) -> Option<DropPreview> {
  let held = state.drag.held()?;
  let target = state.drag.target()?;
  let mut preview =
    drop_preview(held, target, dates)?;
  preview.width =
    preview.width.max(MIN_PREVIEW_WIDTH);
  Some(preview)
}

#[cfg(test)]
mod tests {
  use shiftboard_shared::DisplayMode;

  use super::*;
  use crate::config::{
    Clock,
    WidgetConfig
  };
  use crate::drag::HeldItem;
  use crate::widget::{
    Interaction,
    WidgetEvent,
    transition
  };

  fn date(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
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
        "1",
        "A",
        date(2025, 11, 11),
        "09:00",
        "11:00"
      ),
      ScheduleItem::timed(
        "b",
        "1",
        "B",
        date(2025, 11, 11),
        "10:00",
        "10:30"
      ),
      ScheduleItem::timed(
        "c",
        "1",
        "C",
        date(2025, 11, 11),
        "11:00",
        "12:00"
      ),
      ScheduleItem::all_day(
        "d",
        "2",
        "Vacation",
        date(2025, 11, 13)
      ),
    ];
    (groups, items)
  }

  fn render(
    state: &WidgetState,
    groups: &[Group],
    items: &[ScheduleItem]
  ) -> TimelineBody {
    let config = WidgetConfig::default();
    let translations = config.translations();
    let ctx = ProjectionContext {
      groups,
      items,
      config: &config,
      translations: &translations,
      language: config.language(),
      clock: Clock::fixed(
        date(2025, 11, 12),
        720
      )
    };
    let dates = crate::range::date_range(
      state.view.view,
      state.view.display,
      state.view.reference
    );
    project(state, &ctx, &dates)
  }

  fn week_state() -> WidgetState {
    WidgetState::new(
      date(2025, 11, 12),
      ViewMode::Week,
      DisplayMode::Timeline
    )
  }

  #[test]
  fn week_rows_stack_overlaps_into_lanes() {
    let (groups, items) = sample();
    let body =
      render(&week_state(), &groups, &items);

    let john = &body.rows[0];
    let lanes = john
      .bars
      .iter()
      .map(|bar| (bar.id.as_str(), bar.lane))
      .collect::<Vec<_>>();
    assert_eq!(
      lanes,
      vec![("a", 0), ("b", 1), ("c", 0)]
    );
    assert_eq!(john.bars[1].top_px, 64);
    assert_eq!(john.min_height_px, 112);

    // Tuesday is the second day of seven.
    let a = &john.bars[0];
    assert!(close(
      a.left,
      (1440.0 + 540.0) / 10080.0 * 100.0
    ));
    assert!(close(
      a.width,
      120.0 / 10080.0 * 100.0
    ));
    assert!(john.bars[1].compact);
    assert_eq!(john.bars[1].time_label, None);
    assert_eq!(a.time_label, None);
    assert_eq!(a.tooltip, "A (09:00-11:00)");

    let jane = &body.rows[1];
    assert_eq!(jane.min_height_px, 80);
    let vacation = &jane.bars[0];
    assert!(close(vacation.left, 3.0 / 7.0 * 100.0));
    assert!(close(vacation.width, 100.0 / 7.0));
    assert_eq!(vacation.color, "bg-blue-500");
    assert_eq!(
      vacation.time_label.as_deref(),
      Some("All Day")
    );
  }

  #[test]
  fn week_ticks_label_every_sixth_hour() {
    let ticks = hour_ticks(ViewMode::Week, 7);
    assert_eq!(ticks.len(), 168);
    let labelled = ticks
      .iter()
      .filter(|tick| tick.label.is_some())
      .count();
    assert_eq!(labelled, 28);

    let day = hour_ticks(ViewMode::Day, 1);
    assert!(day.iter().all(|tick| tick.major));
  }

  #[test]
  fn now_marker_only_when_today_is_visible() {
    let (groups, items) = sample();
    let body =
      render(&week_state(), &groups, &items);
    let marker =
      body.now_marker.expect("today visible");
    assert!(close(
      marker,
      (2.0 * 1440.0 + 720.0) / 10080.0 * 100.0
    ));
    assert_eq!(body.now_label.as_deref(), Some("12:00"));

    assert_eq!(
      now_marker(
        &[date(2025, 11, 1)],
        date(2025, 11, 12),
        0
      ),
      None
    );
  }

  #[test]
  fn day_view_uses_day_fractions_and_labels() {
    let (groups, items) = sample();
    let state = WidgetState::new(
      date(2025, 11, 11),
      ViewMode::Day,
      DisplayMode::Timeline
    );
    let body = render(&state, &groups, &items);
    let john = &body.rows[0];

    assert!(close(john.bars[0].left, 37.5));
    assert_eq!(
      john.bars[0].time_label.as_deref(),
      Some("09:00-11:00")
    );
    assert_eq!(
      john.bars[1].time_label.as_deref(),
      Some("10:00-10:30")
    );
    assert_eq!(body.columns[0].label, "Tu, 11.11");
    assert_eq!(body.ticks.len(), 24);
  }

  #[test]
  fn hovered_row_gets_placeholder() {
    let (groups, items) = sample();
    let rules = Interaction::default();
    let mut state = week_state();
    for event in [
      WidgetEvent::DragStart(
        HeldItem::from_item(&items[0])
      ),
      WidgetEvent::DragOver {
        group_id: Some("2".to_string()),
        date:     date(2025, 11, 14),
        minute:   Some(601)
      },
    ] {
      state =
        transition(&state, event, &rules).state;
    }

    let body = render(&state, &groups, &items);
    assert!(!body.rows[0].is_drop_target);
    assert!(body.rows[1].is_drop_target);
    let preview = body.rows[1]
      .drop_preview
      .clone()
      .expect("preview");
    assert_eq!(preview.label, "A • 10:00-12:00");
    assert!(preview.width >= MIN_PREVIEW_WIDTH);
    assert!(close(
      preview.left,
      (4.0 * 1440.0 + 600.0) / 10080.0 * 100.0
    ));
  }

  #[test]
  fn month_rows_stack_one_item_per_line() {
    let (groups, items) = sample();
    let state = WidgetState::new(
      date(2025, 11, 1),
      ViewMode::Month,
      DisplayMode::Timeline
    );
    let body = render(&state, &groups, &items);

    assert_eq!(body.columns.len(), 30);
    assert!(body.ticks.is_empty());
    assert_eq!(body.now_marker, None);

    let john = &body.rows[0];
    let tops = john
      .bars
      .iter()
      .map(|bar| bar.top_px)
      .collect::<Vec<_>>();
    assert_eq!(tops, vec![8, 44, 80]);
    assert_eq!(john.min_height_px, 108);
    assert!(close(
      john.bars[0].left,
      10.0 / 30.0 * 100.0
    ));

    let year = WidgetState::new(
      date(2025, 11, 1),
      ViewMode::Year,
      DisplayMode::Timeline
    );
    let body = render(&year, &groups, &items);
    assert_eq!(body.columns[10].label, "Nov");
    assert_eq!(body.rows[0].bars.len(), 3);
    assert!(close(
      body.rows[0].bars[0].left,
      10.0 / 12.0 * 100.0
    ));
  }
}
