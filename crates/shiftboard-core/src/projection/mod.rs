use chrono::NaiveDate;
use serde::Serialize;
use shiftboard_shared::{
  DisplayMode,
  Group,
  LegendEntry,
  ScheduleItem,
  ViewMode
};

use crate::config::{
  Clock,
  WidgetConfig
};
use crate::i18n::{
  Language,
  Translations
};
use crate::range::{
  date_range,
  range_label
};
use crate::style::{
  group_color,
  item_color,
  item_type_label,
  legend_entries
};
use crate::time::{
  end_or_midnight,
  start_or_midnight
};
use crate::widget::WidgetState;

mod calendar;
mod timeline;

pub use calendar::{
  CalendarBody,
  DayColumn,
  DayList,
  MonthCard,
  MonthCell
};
pub use timeline::{
  HourTick,
  TimelineBar,
  TimelineBody,
  TimelineColumn,
  TimelineRow
};

pub struct ProjectionContext<'a, X> {
  pub groups:       &'a [Group],
  pub items:        &'a [ScheduleItem<X>],
  pub config:       &'a WidgetConfig,
  pub translations: &'a Translations,
  pub language:     Language,
  pub clock:        Clock
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutModel {
  pub header: Option<Header>,
  pub legend: Vec<LegendEntry>,
  pub dates:  Vec<NaiveDate>,
  pub body:   Body
}

#[derive(Debug, Clone, Serialize)]
pub enum Body {
  Calendar(CalendarBody),
  Timeline(TimelineBody)
}

#[derive(Debug, Clone, Serialize)]
pub struct Tab {
  pub key:    &'static str,
  pub label:  String,
  pub active: bool
}

#[derive(Debug, Clone, Serialize)]
pub struct Header {
  pub label:          String,
  pub today_label:    String,
  pub new_item_label: Option<String>,
  pub display_title:  String,
  pub displays:       Vec<Tab>,
  pub period_title:   String,
  pub periods:        Vec<Tab>
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupBadge {
  pub id:       String,
  pub name:     String,
  pub initials: String,
  pub color:    String,
  pub role:     Option<String>,
  pub avatar:   Option<String>
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemChip {
  pub id:         String,
  pub title:      String,
  pub color:      String,
  pub type_label: String,
  pub group_name: String,
  pub all_day:    bool,
  pub time_label: String,
  pub notes:      Option<String>,
  pub draggable:  bool
}

#[tracing::instrument(skip_all)]
pub fn project<X>(
  state: &WidgetState,
  ctx: &ProjectionContext<'_, X>
) -> LayoutModel {
  let view = state.view;
  let dates = date_range(
    view.view,
    view.display,
    view.reference
  );

  let header = ctx
    .config
    .show_controls
    .then(|| header(state, ctx));

  let legend = if ctx.config.show_legend {
    legend_entries(
      ctx.config.legend.as_deref(),
      &ctx.config.item_types
    )
  } else {
    Vec::new()
  };

  let body = match view.display {
    | DisplayMode::Calendar => {
      Body::Calendar(calendar::project(
        state, ctx, &dates
      ))
    }
    | DisplayMode::Timeline => {
      Body::Timeline(timeline::project(
        state, ctx, &dates
      ))
    }
  };

  tracing::debug!(
    view = view.view.as_key(),
    display = view.display.as_key(),
    dates = dates.len(),
    "projected layout"
  );

  LayoutModel {
    header,
    legend,
    dates,
    body
  }
}

fn header<X>(
  state: &WidgetState,
  ctx: &ProjectionContext<'_, X>
) -> Header {
  let t = ctx.translations;
  let view = state.view;

  let displays = [
    (DisplayMode::Calendar, &t.calendar),
    (DisplayMode::Timeline, &t.timeline)
  ]
  .into_iter()
  .map(|(display, label)| Tab {
    key:    display.as_key(),
    label:  label.to_string(),
    active: display == view.display
  })
  .collect();

  let periods = ViewMode::all()
    .into_iter()
    .map(|mode| Tab {
      key:    mode.as_key(),
      label:  view_label(t, mode),
      active: mode == view.view
    })
    .collect();

  Header {
    label: range_label(
      view.view,
      view.reference,
      ctx.language
    ),
    today_label: t.today.to_string(),
    new_item_label: ctx
      .config
      .can_create
      .then(|| t.new_item.to_string()),
    display_title: t.view.to_string(),
    displays,
    period_title: t.period.to_string(),
    periods
  }
}

fn view_label(
  t: &Translations,
  mode: ViewMode
) -> String {
  match mode {
    | ViewMode::Day => t.day.to_string(),
    | ViewMode::Week => t.week.to_string(),
    | ViewMode::Month => {
      t.month.to_string()
    }
    | ViewMode::Year => t.year.to_string()
  }
}

fn group_badge(
  group: &Group,
  index: usize,
  config: &WidgetConfig
) -> GroupBadge {
  GroupBadge {
    id:       group.id.clone(),
    name:     group.name.clone(),
    initials: group.initials(),
    color:    group_color(group, index),
    role:     group
      .role
      .clone()
      .filter(|_| config.show_group_role),
    avatar:   group
      .avatar
      .clone()
      .filter(|_| config.show_group_avatar)
  }
}

fn time_label<X>(
  item: &ScheduleItem<X>,
  t: &Translations
) -> String {
  if item.all_day {
    t.all_day.to_string()
  } else {
    format!(
      "{}-{}",
      start_or_midnight(item),
      end_or_midnight(item)
    )
  }
}

fn item_chip<X>(
  item: &ScheduleItem<X>,
  group: &Group,
  ctx: &ProjectionContext<'_, X>
) -> ItemChip {
  ItemChip {
    id:         item.id.clone(),
    title:      item.title.clone(),
    color:      item_color(
      item,
      &ctx.config.item_types
    ),
    type_label: item_type_label(
      item,
      &ctx.config.item_types,
      ctx.translations
    ),
    group_name: group.name.clone(),
    all_day:    item.all_day,
    time_label: time_label(
      item,
      ctx.translations
    ),
    notes:      item.notes.clone(),
    draggable:  ctx.config.can_edit
  }
}

fn more_label(
  hidden: usize,
  t: &Translations
) -> Option<String> {
  (hidden > 0).then(|| {
    format!("+{hidden} {}", t.more_items)
  })
}

#[cfg(test)]
mod tests {
  use shiftboard_shared::{
    Group,
    ScheduleItem
  };

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
  fn header_follows_config_and_locale() {
    let mut config = WidgetConfig {
      locale: "de".to_string(),
      ..WidgetConfig::default()
    };
    let translations = config.translations();
    let groups = vec![Group::new("1", "A")];
    let items: Vec<ScheduleItem> = Vec::new();
    let state = WidgetState::new(
      date(2025, 3, 12),
      ViewMode::Month,
      DisplayMode::Calendar
    );

    let model = {
      let ctx = ProjectionContext {
        groups:       &groups,
        items:        &items,
        config:       &config,
        translations: &translations,
        language:     config.language(),
        clock:        Clock::fixed(
          date(2025, 3, 12),
          600
        )
      };
      project(&state, &ctx)
    };
    let header =
      model.header.expect("controls shown");
    assert_eq!(header.label, "März 2025");
    assert_eq!(header.today_label, "Heute");
    assert!(header.new_item_label.is_some());
    assert!(
      header
        .periods
        .iter()
        .any(|tab| tab.active
          && tab.key == "month"
          && tab.label == "Monat")
    );
    assert_eq!(model.legend.len(), 7);

    config.show_controls = false;
    config.show_legend = false;
    let ctx = ProjectionContext {
      groups:       &groups,
      items:        &items,
      config:       &config,
      translations: &translations,
      language:     config.language(),
      clock:        Clock::fixed(
        date(2025, 3, 12),
        600
      )
    };
    let model = project(&state, &ctx);
    assert!(model.header.is_none());
    assert!(model.legend.is_empty());
  }

  #[test]
  fn badge_hides_role_and_avatar_when_disabled()
  {
    let mut group =
      Group::new("1", "Jane Smith");
    group.role = Some("Lead".to_string());
    group.avatar =
      Some("jane.png".to_string());

    let shown = group_badge(
      &group,
      1,
      &WidgetConfig::default()
    );
    assert_eq!(shown.initials, "JS");
    assert_eq!(shown.color, "bg-blue-500");
    assert_eq!(shown.role.as_deref(), Some("Lead"));
    assert_eq!(
      shown.avatar.as_deref(),
      Some("jane.png")
    );

    let hidden = group_badge(
      &group,
      1,
      &WidgetConfig {
        show_group_role: false,
        show_group_avatar: false,
        ..WidgetConfig::default()
      }
    );
    assert_eq!(hidden.role, None);
    assert_eq!(hidden.avatar, None);
  }
}
