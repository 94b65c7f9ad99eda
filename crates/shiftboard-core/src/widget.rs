use chrono::NaiveDate;
use serde::Serialize;
use shiftboard_shared::{
  DisplayMode,
  ItemDraft,
  ItemPatch,
  ScheduleItem,
  ViewMode
};

use crate::drag::{
  DropTarget,
  HeldItem,
  plan_relocation,
  snap_minute
};
use crate::range::{
  Direction,
  navigate
};
use crate::time::{
  DEFAULT_SNAP_MINUTES,
  MINUTES_PER_DAY
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct ViewState {
  pub reference: NaiveDate,
  pub view:      ViewMode,
  pub display:   DisplayMode
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
)]
pub enum DragState {
  #[default]
  Idle,
  Dragging {
    item:   HeldItem,
    target: Option<DropTarget>
  }
}

impl DragState {
  pub fn held(&self) -> Option<&HeldItem> {
    match self {
      | Self::Idle => None,
      | Self::Dragging { item, .. } => {
        Some(item)
      }
    }
  }

  pub fn target(
    &self
  ) -> Option<&DropTarget> {
    match self {
      | Self::Idle => None,
      | Self::Dragging {
        target, ..
      } => target.as_ref()
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct WidgetState {
  pub view: ViewState,
  pub drag: DragState
}

impl WidgetState {
  pub fn new(
    reference: NaiveDate,
    view: ViewMode,
    display: DisplayMode
  ) -> Self {
    Self {
      view: ViewState {
        reference,
        view,
        display
      },
      drag: DragState::Idle
    }
  }

  fn snaps_to_grid(&self) -> bool {
    self.view.display
      == DisplayMode::Timeline
      && self.view.view.is_time_bearing()
  }

  /// Only day and week timelines resolve a time; everything else
  /// moves whole days.
  fn drop_minute(
    &self,
    minute: Option<u32>,
    snap_minutes: u32
  ) -> Option<u32> {
    if !self.snaps_to_grid() {
      return None;
    }
    minute.map(|minute| {
      snap_minute(
        minute.min(MINUTES_PER_DAY - 1),
        snap_minutes
      )
    })
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct Interaction {
  pub can_create:   bool,
  pub can_edit:     bool,
  pub snap_minutes: u32
}

impl Default for Interaction {
  fn default() -> Self {
    Self {
      can_create:   true,
      can_edit:     true,
      snap_minutes: DEFAULT_SNAP_MINUTES
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
  Navigate(Direction),
  Today(NaiveDate),
  SetView(ViewMode),
  SetDisplay(DisplayMode),
  ClickItem(String),
  RequestCreate {
    group_id: Option<String>,
    date:     Option<NaiveDate>
  },
  DragStart(HeldItem),
  DragOver {
    group_id: Option<String>,
    date:     NaiveDate,
    minute:   Option<u32>
  },
  DragLeave,
  Drop {
    group_id: Option<String>,
    date:     NaiveDate,
    minute:   Option<u32>
  },
  DragEnd
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
)]
pub enum Effect {
  ItemClicked(String),
  CreateRequested(ItemDraft),
  UpdateRequested {
    id:    String,
    patch: ItemPatch
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
  pub state:   WidgetState,
  pub effects: Vec<Effect>
}

impl Transition {
  fn quiet(state: WidgetState) -> Self {
    Self {
      state,
      effects: Vec::new()
    }
  }
}

pub fn transition(
  state: &WidgetState,
  event: WidgetEvent,
  rules: &Interaction
) -> Transition {
  let mut next = state.clone();

  match event {
    | WidgetEvent::Navigate(direction) => {
      next.view.reference = navigate(
        state.view.reference,
        state.view.view,
        direction
      );
      Transition::quiet(next)
    }
    | WidgetEvent::Today(today) => {
      next.view.reference = today;
      Transition::quiet(next)
    }
    | WidgetEvent::SetView(view) => {
      next.view.view = view;
      Transition::quiet(next)
    }
    | WidgetEvent::SetDisplay(display) => {
      next.view.display = display;
      Transition::quiet(next)
    }
    | WidgetEvent::ClickItem(id) => {
      Transition {
        state:   next,
        effects: vec![Effect::ItemClicked(
          id
        )]
      }
    }
    | WidgetEvent::RequestCreate {
      group_id,
      date
    } => {
      if !rules.can_create {
        tracing::debug!(
          "creation disabled; ignoring \
           create request"
        );
        return Transition::quiet(next);
      }
      let draft = ItemDraft {
        employee_id: group_id,
        date:        date.unwrap_or(
          state.view.reference
        )
      };
      Transition {
        state:   next,
        effects: vec![
          Effect::CreateRequested(draft),
        ]
      }
    }
    | WidgetEvent::DragStart(item) => {
      if !rules.can_edit {
        tracing::debug!(
          item = %item.id,
          "editing disabled; item is not \
           draggable"
        );
        return Transition::quiet(next);
      }
      tracing::debug!(item = %item.id, "drag started");
      next.drag = DragState::Dragging {
        item,
        target: None
      };
      Transition::quiet(next)
    }
    | WidgetEvent::DragOver {
      group_id,
      date,
      minute
    } => {
      let minute = state.drop_minute(
        minute,
        rules.snap_minutes
      );
      if let DragState::Dragging {
        target,
        ..
      } = &mut next.drag
      {
        *target = Some(DropTarget {
          group_id,
          date,
          minute
        });
      }
      Transition::quiet(next)
    }
    | WidgetEvent::DragLeave => {
      if let DragState::Dragging {
        target,
        ..
      } = &mut next.drag
      {
        *target = None;
      }
      Transition::quiet(next)
    }
    | WidgetEvent::Drop {
      group_id,
      date,
      minute
    } => {
      let held = match std::mem::take(
        &mut next.drag
      ) {
        | DragState::Dragging {
          item, ..
        } => item,
        | DragState::Idle => {
          tracing::debug!(
            "drop without a held item"
          );
          return Transition::quiet(next);
        }
      };

      let minute = state.drop_minute(
        minute,
        rules.snap_minutes
      );
      let group_id = group_id.unwrap_or_else(|| {
        held.employee_id.clone()
      });
      let patch = plan_relocation(
        &held, &group_id, date, minute
      );
      tracing::info!(
        item = %held.id,
        group = %group_id,
        date = %date,
        "proposing item relocation"
      );

      Transition {
        state:   next,
        effects: vec![
          Effect::UpdateRequested {
            id: held.id,
            patch
          },
        ]
      }
    }
    | WidgetEvent::DragEnd => {
      next.drag = DragState::Idle;
      Transition::quiet(next)
    }
  }
}

/// Receiver of the proposals the widget makes.
pub trait ScheduleHost<X> {
  fn item_clicked(
    &mut self,
    item: &ScheduleItem<X>
  );

  fn item_create_requested(
    &mut self,
    draft: ItemDraft
  );

  fn item_update_requested(
    &mut self,
    id: &str,
    patch: ItemPatch
  );
}

#[derive(Debug, Clone)]
pub struct Scheduler {
  state: WidgetState,
  rules: Interaction
}

impl Scheduler {
  pub fn new(
    state: WidgetState,
    rules: Interaction
  ) -> Self {
    Self { state, rules }
  }

  pub fn state(&self) -> &WidgetState {
    &self.state
  }

  pub fn rules(&self) -> &Interaction {
    &self.rules
  }

  /// Start dragging the item with `id`, if the host supplied one.
  pub fn begin_drag<X>(
    &mut self,
    id: &str,
    items: &[ScheduleItem<X>]
  ) -> bool {
    let Some(item) = items
      .iter()
      .find(|item| item.id == id)
    else {
      tracing::warn!(
        item = %id,
        "cannot drag unknown item"
      );
      return false;
    };
    self.apply(WidgetEvent::DragStart(
      HeldItem::from_item(item)
    ));
    self.state.drag.held().is_some()
  }

  /// Apply an event and keep the effects for the caller.
  pub fn apply(
    &mut self,
    event: WidgetEvent
  ) -> Vec<Effect> {
    let Transition { state, effects } =
      transition(
        &self.state,
        event,
        &self.rules
      );
    self.state = state;
    effects
  }

  #[tracing::instrument(skip_all)]
  pub fn dispatch<X, H>(
    &mut self,
    event: WidgetEvent,
    items: &[ScheduleItem<X>],
    host: &mut H
  ) where
    H: ScheduleHost<X>
  {
    for effect in self.apply(event) {
      match effect {
        | Effect::ItemClicked(id) => {
          match items
            .iter()
            .find(|item| item.id == id)
          {
            | Some(item) => {
              host.item_clicked(item)
            }
            | None => {
              tracing::warn!(
                item = %id,
                "clicked item is not in the \
                 current data"
              );
            }
          }
        }
        | Effect::CreateRequested(
          draft
        ) => {
          host.item_create_requested(draft)
        }
        | Effect::UpdateRequested {
          id,
          patch
        } => {
          host.item_update_requested(
            &id, patch
          )
        }
      }
    }
  }
}
