use anyhow::{anyhow, bail};
use chrono::NaiveDate;
use shiftboard_shared::{DisplayMode, Extra, ItemDraft, ItemPatch, ScheduleItem, ViewMode};
use tracing::{debug, info, instrument, warn};

use crate::bucket::items_for_group_and_date;
use crate::cli::{Command, CreateArgs, LanesArgs, MoveArgs, ShowArgs, ViewArgs};
use crate::config::{Clock, WidgetConfig};
use crate::data::ScheduleData;
use crate::drag::resolve_pointer;
use crate::layout::assign_lanes;
use crate::projection::{LayoutModel, ProjectionContext, project};
use crate::range::{Direction, date_range};
use crate::render::Renderer;
use crate::time::{end_or_midnight, start_or_midnight};
use crate::widget::{Scheduler, ScheduleHost, WidgetEvent, WidgetState};

/// Host that records every proposal instead of persisting it.
#[derive(Debug, Default)]
pub struct ProposalLog {
    pub clicked: Vec<String>,
    pub drafts: Vec<ItemDraft>,
    pub updates: Vec<(String, ItemPatch)>,
}

impl ScheduleHost<Extra> for ProposalLog {
    fn item_clicked(&mut self, item: &ScheduleItem) {
        self.clicked.push(item.id.clone());
    }

    fn item_create_requested(&mut self, draft: ItemDraft) {
        self.drafts.push(draft);
    }

    fn item_update_requested(&mut self, id: &str, patch: ItemPatch) {
        self.updates.push((id.to_string(), patch));
    }
}

pub fn dispatch(
    cfg: &WidgetConfig,
    clock: Clock,
    renderer: &mut Renderer,
    command: Command,
) -> anyhow::Result<()> {
    debug!(?command, today = %clock.today, "dispatching command");

    match command {
        Command::Show(args) => cmd_show(cfg, clock, renderer, args),
        Command::Lanes(args) => cmd_lanes(cfg, renderer, args),
        Command::Move(args) => cmd_move(cfg, clock, renderer, args),
        Command::Create(args) => cmd_create(cfg, clock, renderer, args),
    }
}

pub fn initial_state(cfg: &WidgetConfig, args: &ViewArgs, today: NaiveDate) -> WidgetState {
    WidgetState::new(
        args.date.unwrap_or(today),
        args.view.unwrap_or(cfg.view),
        args.display.unwrap_or(cfg.display),
    )
}

pub fn step_periods(scheduler: &mut Scheduler, step: i32) {
    let direction = if step < 0 { Direction::Prev } else { Direction::Next };
    for _ in 0..step.unsigned_abs() {
        scheduler.apply(WidgetEvent::Navigate(direction));
    }
}

pub fn layout_for(
    cfg: &WidgetConfig,
    data: &ScheduleData,
    state: &WidgetState,
    clock: Clock,
) -> LayoutModel {
    let translations = cfg.translations();
    let ctx = ProjectionContext {
        groups: &data.groups,
        items: &data.items,
        config: cfg,
        translations: &translations,
        language: cfg.language(),
        clock,
    };
    project(state, &ctx)
}

#[instrument(skip(cfg, renderer, args))]
fn cmd_show(
    cfg: &WidgetConfig,
    clock: Clock,
    renderer: &mut Renderer,
    args: ShowArgs,
) -> anyhow::Result<()> {
    let mut cfg = cfg.clone();
    if let Some(locale) = args.locale {
        cfg.locale = locale;
    }

    let data = ScheduleData::load(&args.data)?;
    let mut scheduler = Scheduler::new(initial_state(&cfg, &args.view, clock.today), cfg.interaction());
    step_periods(&mut scheduler, args.step);

    let model = layout_for(&cfg, &data, scheduler.state(), clock);
    if args.json {
        renderer.print_json(&model)
    } else {
        renderer.print_layout(&model)
    }
}

pub fn lane_rows(cfg: &WidgetConfig, data: &ScheduleData, group: &str, date: NaiveDate) -> Vec<Vec<String>> {
    let items = items_for_group_and_date(&data.items, group, date);
    let lanes = assign_lanes(&items);
    let all_day = cfg.translations().all_day;

    items
        .iter()
        .zip(lanes)
        .map(|(item, lane)| {
            let time = if item.all_day {
                all_day.to_string()
            } else {
                format!("{}-{}", start_or_midnight(*item), end_or_midnight(*item))
            };
            vec![item.title.clone(), time, lane.to_string()]
        })
        .collect()
}

#[instrument(skip(cfg, renderer, args))]
fn cmd_lanes(cfg: &WidgetConfig, renderer: &mut Renderer, args: LanesArgs) -> anyhow::Result<()> {
    let data = ScheduleData::load(&args.data)?;
    if data.group(&args.group).is_none() {
        warn!(group = %args.group, "group is not part of the data; its items are never drawn");
    }

    let rows = lane_rows(cfg, &data, &args.group, args.date);
    renderer.print_table(
        vec![cfg.item_label.clone(), "Time".to_string(), "Lane".to_string()],
        rows,
    )
}

/// Column date and unsnapped minute under a pointer at `fraction` of a row.
pub fn drop_slot(
    view: ViewMode,
    dates: &[NaiveDate],
    fraction: f64,
) -> anyhow::Result<(NaiveDate, Option<u32>)> {
    if view.is_time_bearing() {
        let slot = resolve_pointer(fraction, dates).ok_or_else(|| anyhow!("no visible dates"))?;
        return Ok((slot.date, Some(slot.minute)));
    }

    if dates.is_empty() {
        bail!("no visible dates");
    }
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let column = ((fraction * dates.len() as f64).floor() as usize).min(dates.len() - 1);
    Ok((dates[column], None))
}

pub fn plan_move(
    cfg: &WidgetConfig,
    data: &ScheduleData,
    state: WidgetState,
    item_id: &str,
    group_id: &str,
    fraction: f64,
) -> anyhow::Result<ItemPatch> {
    data.item(item_id)?;
    if data.group(group_id).is_none() {
        bail!("no group with id {group_id}");
    }

    let dates = date_range(state.view.view, state.view.display, state.view.reference);
    let (date, minute) = drop_slot(state.view.view, &dates, fraction)?;

    let mut scheduler = Scheduler::new(state, cfg.interaction());
    if !scheduler.begin_drag(item_id, &data.items) {
        bail!("editing is disabled; item {item_id} cannot be moved");
    }

    let mut log = ProposalLog::default();
    scheduler.dispatch(
        WidgetEvent::DragOver {
            group_id: Some(group_id.to_string()),
            date,
            minute,
        },
        &data.items,
        &mut log,
    );
    scheduler.dispatch(
        WidgetEvent::Drop {
            group_id: Some(group_id.to_string()),
            date,
            minute,
        },
        &data.items,
        &mut log,
    );

    let (_, patch) = log
        .updates
        .pop()
        .ok_or_else(|| anyhow!("drop produced no update for item {item_id}"))?;
    Ok(patch)
}

#[instrument(skip(cfg, renderer, args))]
fn cmd_move(
    cfg: &WidgetConfig,
    clock: Clock,
    renderer: &mut Renderer,
    args: MoveArgs,
) -> anyhow::Result<()> {
    let data = ScheduleData::load(&args.data)?;
    let mut state = initial_state(cfg, &args.view, clock.today);
    state.view.display = DisplayMode::Timeline;

    let patch = plan_move(cfg, &data, state, &args.item, &args.group, args.fraction)?;
    info!(item = %args.item, ?patch, "proposed move");

    if args.apply {
        let mut item = data.item(&args.item)?.clone();
        patch.apply_to(&mut item);
        renderer.print_json(&item)
    } else {
        renderer.print_json(&patch)
    }
}

pub fn plan_create(
    cfg: &WidgetConfig,
    today: NaiveDate,
    group_id: Option<String>,
    date: Option<NaiveDate>,
) -> anyhow::Result<ItemDraft> {
    let state = WidgetState::new(today, cfg.view, cfg.display);
    let mut scheduler = Scheduler::new(state, cfg.interaction());
    let mut log = ProposalLog::default();
    let items: Vec<ScheduleItem> = Vec::new();

    scheduler.dispatch(WidgetEvent::RequestCreate { group_id, date }, &items, &mut log);
    log.drafts
        .pop()
        .ok_or_else(|| anyhow!("item creation is disabled"))
}

#[instrument(skip(cfg, renderer, args))]
fn cmd_create(
    cfg: &WidgetConfig,
    clock: Clock,
    renderer: &mut Renderer,
    args: CreateArgs,
) -> anyhow::Result<()> {
    let draft = plan_create(cfg, clock.today, args.group, args.date)?;
    renderer.print_json(&draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn data() -> ScheduleData {
        ScheduleData::from_json(
            r#"{
              "groups": [
                { "id": "1", "name": "John Doe" },
                { "id": "2", "name": "Jane Smith" }
              ],
              "items": [
                { "id": "a", "employeeId": "1", "title": "A", "date": "2025-11-11",
                  "startTime": "09:00", "endTime": "11:00" },
                { "id": "b", "employeeId": "1", "title": "B", "date": "2025-11-11",
                  "startTime": "10:00", "endTime": "10:30" },
                { "id": "c", "employeeId": "1", "title": "C", "date": "2025-11-11",
                  "startTime": "11:00", "endTime": "12:00" }
              ]
            }"#,
        )
        .expect("sample data")
    }

    #[test]
    fn lanes_follow_overlap() {
        let rows = lane_rows(&WidgetConfig::default(), &data(), "1", date(2025, 11, 11));
        let lanes = rows.iter().map(|row| row[2].as_str()).collect::<Vec<_>>();
        assert_eq!(lanes, vec!["0", "1", "0"]);
        assert_eq!(rows[1][1], "10:00-10:30");
    }

    #[test]
    fn move_on_week_timeline_snaps_and_keeps_duration() {
        let state = WidgetState::new(date(2025, 11, 12), ViewMode::Week, DisplayMode::Timeline);
        // Friday 14:17 of the week starting Monday the 10th.
        let fraction = (4.0 * 1440.0 + 857.5) / 10080.0;

        let patch = plan_move(&WidgetConfig::default(), &data(), state, "a", "2", fraction)
            .expect("move planned");

        assert_eq!(patch.employee_id.as_deref(), Some("2"));
        assert_eq!(patch.date, Some(date(2025, 11, 14)));
        assert_eq!(patch.start_time.as_deref(), Some("14:15"));
        assert_eq!(patch.end_time.as_deref(), Some("16:15"));
    }

    #[test]
    fn move_on_month_timeline_changes_date_only() {
        let state = WidgetState::new(date(2025, 11, 1), ViewMode::Month, DisplayMode::Timeline);
        let patch = plan_move(&WidgetConfig::default(), &data(), state, "b", "1", 0.99)
            .expect("move planned");
        assert_eq!(patch.date, Some(date(2025, 11, 30)));
        assert_eq!(patch.start_time, None);
    }

    #[test]
    fn move_rejects_unknown_ids_and_disabled_editing() {
        let state = WidgetState::new(date(2025, 11, 12), ViewMode::Day, DisplayMode::Timeline);
        let cfg = WidgetConfig::default();
        assert!(plan_move(&cfg, &data(), state.clone(), "zzz", "1", 0.5).is_err());
        assert!(plan_move(&cfg, &data(), state.clone(), "a", "9", 0.5).is_err());

        let locked = WidgetConfig {
            can_edit: false,
            ..WidgetConfig::default()
        };
        assert!(plan_move(&locked, &data(), state, "a", "1", 0.5).is_err());
    }

    #[test]
    fn create_uses_today_unless_dated() {
        let cfg = WidgetConfig::default();
        let draft = plan_create(&cfg, date(2026, 10, 15), Some("1".to_string()), None).expect("draft");
        assert_eq!(draft.date, date(2026, 10, 15));
        assert_eq!(draft.employee_id.as_deref(), Some("1"));

        let locked = WidgetConfig {
            can_create: false,
            ..WidgetConfig::default()
        };
        assert!(plan_create(&locked, date(2026, 10, 15), None, None).is_err());
    }

    #[test]
    fn stepping_navigates_by_view() {
        let cfg = WidgetConfig::default();
        let args = ViewArgs {
            date: Some(date(2025, 1, 31)),
            view: Some(ViewMode::Month),
            display: None,
        };
        let mut scheduler = Scheduler::new(initial_state(&cfg, &args, date(2026, 10, 15)), cfg.interaction());
        step_periods(&mut scheduler, 1);
        assert_eq!(scheduler.state().view.reference, date(2025, 2, 28));
        step_periods(&mut scheduler, -2);
        assert_eq!(scheduler.state().view.reference, date(2024, 12, 28));
        assert_eq!(scheduler.state().view.display, DisplayMode::Calendar);
    }

    #[test]
    fn proposal_log_records_clicks() {
        let data = data();
        let cfg = WidgetConfig::default();
        let mut scheduler = Scheduler::new(
            WidgetState::new(date(2025, 11, 11), ViewMode::Day, DisplayMode::Calendar),
            cfg.interaction(),
        );
        let mut log = ProposalLog::default();
        scheduler.dispatch(WidgetEvent::ClickItem("b".to_string()), &data.items, &mut log);
        assert_eq!(log.clicked, vec!["b"]);
    }
}
