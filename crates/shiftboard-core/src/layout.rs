use std::cmp::Ordering;

use crate::time::{
  TimeSpan,
  occupied_interval,
  start_or_midnight,
  time_to_minutes
};

/// Greedy first-fit lane assignment for items sharing one day.
///
/// Items are visited all-day first, then by start time; each takes the
/// first lane with no half-open overlap. The returned lanes line up
/// with the input order, not the visiting order.
pub fn assign_lanes<T: TimeSpan>(
  items: &[T]
) -> Vec<usize> {
  let mut order = (0..items.len())
    .collect::<Vec<_>>();
  // `sort_by` is stable, equal starts keep input order.
  order.sort_by(|&a, &b| {
    compare_for_lanes(
      &items[a], &items[b]
    )
  });

  let mut lanes: Vec<Vec<(f64, f64)>> =
    Vec::new();
  let mut assigned =
    vec![0_usize; items.len()];

  for index in order {
    let (start, end) =
      occupied_interval(&items[index]);

    let free = lanes.iter().position(
      |occupants| {
        !occupants.iter().any(
          |&(other_start, other_end)| {
            !(end <= other_start
              || start >= other_end)
          }
        )
      }
    );

    let lane = match free {
      | Some(lane) => lane,
      | None => {
        lanes.push(Vec::new());
        lanes.len() - 1
      }
    };

    lanes[lane].push((start, end));
    assigned[index] = lane;
  }

  tracing::trace!(
    items = items.len(),
    lanes = lanes.len(),
    "assigned overlap lanes"
  );
  assigned
}

fn compare_for_lanes<T: TimeSpan>(
  a: &T,
  b: &T
) -> Ordering {
  match (a.is_all_day(), b.is_all_day())
  {
    | (true, false) => Ordering::Less,
    | (false, true) => {
      Ordering::Greater
    }
    | _ => {
      let a_start = time_to_minutes(
        start_or_midnight(a)
      );
      let b_start = time_to_minutes(
        start_or_midnight(b)
      );
      a_start
        .partial_cmp(&b_start)
        .unwrap_or(Ordering::Equal)
    }
  }
}

pub fn lane_count(
  lanes: &[usize]
) -> usize {
  lanes
    .iter()
    .max()
    .map(|max| max + 1)
    .unwrap_or(0)
}
