//! Horizontal stacking of overlapping timed events.
//!
//! Events are placed in start order. An event that overlaps earlier ones is
//! pushed one stack unit to the right of the deepest of them, giving a
//! cascading stack rather than packed columns.
//!
//! Every earlier event that overlaps the current one started no later than
//! it and ends after its start, so all of them contain the current start
//! instant and overlap each other. Their depths are therefore all distinct,
//! and for a plain cascade the deepest is exactly the number of them.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::color::ColorMemo;
use crate::event::{CalendarEvent, PositionedEvent};
use crate::grid::{GridConfig, Pixels, position_in_grid};

/// Half-open interval overlap: touching intervals do not overlap.
pub fn events_overlap(
    a: (DateTime<Utc>, DateTime<Utc>),
    b: (DateTime<Utc>, DateTime<Utc>),
) -> bool {
    a.0 < b.1 && b.0 < a.1
}

struct Placed {
    range: (DateTime<Utc>, DateTime<Utc>),
    depth: usize,
}

/// Positions one day's timed events.
///
/// The output is in start order (ties keep input order). Events without a
/// start and end timestamp are skipped but still consume a `z_index`.
pub fn arrange(
    events: &[CalendarEvent],
    grid: &GridConfig,
    tz: &Tz,
    colors: &mut ColorMemo<'_>,
) -> Vec<PositionedEvent> {
    let mut order: Vec<&CalendarEvent> = events.iter().collect();
    order.sort_by_key(|event| event.start.to_utc_datetime());

    let mut placed: Vec<Placed> = Vec::with_capacity(order.len());
    let mut positioned = Vec::with_capacity(order.len());

    for (z_index, event) in order.into_iter().enumerate() {
        let Some(range) = event.time_range() else {
            continue;
        };

        let depth = placed
            .iter()
            .filter(|p| events_overlap(p.range, range))
            .map(|p| p.depth + 1)
            .max()
            .unwrap_or(0);
        placed.push(Placed { range, depth });

        let position = position_in_grid(range.0, range.1, grid, tz);
        positioned.push(PositionedEvent {
            event: event.clone(),
            top: position.top,
            height: position.height,
            left_offset: Pixels(depth as f64 * grid.stack_unit),
            z_index,
            color: colors.scheme_for(event),
        });
    }

    positioned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorResolver, Palette};
    use chrono::{NaiveDate, TimeZone};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    /// Timed event on Monday 2025-02-03 between two `HH:MM` wall times (UTC).
    fn monday(id: &str, from: (u32, u32), to: (u32, u32)) -> CalendarEvent {
        CalendarEvent::timed(
            id,
            id,
            utc(2025, 2, 3, from.0, from.1, 0),
            utc(2025, 2, 3, to.0, to.1, 0),
        )
    }

    fn run(events: &[CalendarEvent]) -> Vec<PositionedEvent> {
        let resolver = ColorResolver::hashed(Palette::pastel());
        let mut memo = ColorMemo::new(&resolver);
        arrange(events, &GridConfig::default(), &Tz::UTC, &mut memo)
    }

    fn offsets(positioned: &[PositionedEvent]) -> Vec<(&str, f64)> {
        positioned
            .iter()
            .map(|p| (p.event.id.as_str(), p.left_offset.value()))
            .collect()
    }

    fn assert_overlap_invariant(positioned: &[PositionedEvent], stack_unit: f64) {
        for (i, a) in positioned.iter().enumerate() {
            for b in &positioned[i + 1..] {
                let (Some(ra), Some(rb)) = (a.event.time_range(), b.event.time_range()) else {
                    continue;
                };
                if events_overlap(ra, rb) {
                    let gap = (a.left_offset.value() - b.left_offset.value()).abs();
                    assert!(
                        gap >= stack_unit,
                        "{} and {} overlap but are {gap}px apart",
                        a.event.id,
                        b.event.id
                    );
                }
            }
        }
    }

    mod overlap {
        use super::*;

        #[test]
        fn half_open() {
            let a = (utc(2025, 2, 3, 9, 0, 0), utc(2025, 2, 3, 10, 0, 0));
            let b = (utc(2025, 2, 3, 10, 0, 0), utc(2025, 2, 3, 11, 0, 0));
            assert!(!events_overlap(a, b));
            assert!(!events_overlap(b, a));
        }

        #[test]
        fn partial_and_contained() {
            let a = (utc(2025, 2, 3, 9, 0, 0), utc(2025, 2, 3, 10, 0, 0));
            let b = (utc(2025, 2, 3, 9, 30, 0), utc(2025, 2, 3, 11, 0, 0));
            let c = (utc(2025, 2, 3, 9, 15, 0), utc(2025, 2, 3, 9, 45, 0));
            assert!(events_overlap(a, b));
            assert!(events_overlap(a, c));
            assert!(events_overlap(c, a));
        }
    }

    mod stacking {
        use super::*;

        #[test]
        fn monday_scenario() {
            let positioned = run(&[
                monday("A", (9, 0), (10, 0)),
                monday("B", (9, 30), (11, 0)),
                monday("C", (14, 0), (15, 0)),
            ]);
            assert_eq!(offsets(&positioned), [("A", 0.0), ("B", 8.0), ("C", 0.0)]);

            let tops: Vec<f64> = positioned.iter().map(|p| p.top.value()).collect();
            assert_eq!(tops, [72.0, 84.0, 192.0]);
            assert_eq!(positioned[1].height, Pixels(36.0));
        }

        #[test]
        fn back_to_back_events_do_not_stack() {
            let positioned = run(&[
                monday("A", (9, 0), (10, 0)),
                monday("B", (10, 0), (11, 0)),
                monday("C", (11, 0), (12, 0)),
            ]);
            assert!(positioned.iter().all(|p| p.left_offset == Pixels::ZERO));
        }

        #[test]
        fn three_mutually_overlapping_stack_three_deep() {
            let positioned = run(&[
                monday("A", (9, 0), (12, 0)),
                monday("B", (9, 30), (11, 0)),
                monday("C", (10, 0), (10, 30)),
            ]);
            assert_eq!(offsets(&positioned), [("A", 0.0), ("B", 8.0), ("C", 16.0)]);
        }

        #[test]
        fn cascade_never_collides_with_deeper_predecessor() {
            // C overlaps only B, which already sits one unit deep.
            let positioned = run(&[
                monday("A", (9, 0), (10, 0)),
                monday("B", (9, 30), (11, 0)),
                monday("C", (10, 30), (11, 30)),
            ]);
            assert_eq!(offsets(&positioned), [("A", 0.0), ("B", 8.0), ("C", 16.0)]);
            assert_overlap_invariant(&positioned, 8.0);
        }

        #[test]
        fn dense_day_keeps_overlap_invariant() {
            let events: Vec<_> = (0..24)
                .map(|i| {
                    let start = 7 * 60 + (i * 37) % (13 * 60);
                    let end = start + 20 + (i * 53) % 150;
                    CalendarEvent::timed(
                        format!("e{i}"),
                        "dense",
                        utc(2025, 2, 3, 0, 0, 0) + chrono::Duration::minutes(start),
                        utc(2025, 2, 3, 0, 0, 0) + chrono::Duration::minutes(end),
                    )
                })
                .collect();
            let positioned = run(&events);
            assert_eq!(positioned.len(), events.len());
            assert_overlap_invariant(&positioned, 8.0);
        }

        #[test]
        fn custom_stack_unit() {
            let resolver = ColorResolver::default();
            let mut memo = ColorMemo::new(&resolver);
            let grid = GridConfig {
                stack_unit: 12.0,
                ..Default::default()
            };
            let positioned = arrange(
                &[monday("A", (9, 0), (10, 0)), monday("B", (9, 0), (10, 0))],
                &grid,
                &Tz::UTC,
                &mut memo,
            );
            assert_eq!(positioned[1].left_offset, Pixels(12.0));
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn sorts_by_start_and_assigns_z_index() {
            let positioned = run(&[
                monday("late", (14, 0), (15, 0)),
                monday("early", (9, 0), (10, 0)),
            ]);
            let ids: Vec<_> = positioned.iter().map(|p| p.event.id.as_str()).collect();
            assert_eq!(ids, ["early", "late"]);
            assert_eq!(positioned[0].z_index, 0);
            assert_eq!(positioned[1].z_index, 1);
        }

        #[test]
        fn ties_keep_input_order() {
            let positioned = run(&[
                monday("first", (9, 0), (10, 0)),
                monday("second", (9, 0), (9, 30)),
                monday("third", (9, 0), (11, 0)),
            ]);
            assert_eq!(
                offsets(&positioned),
                [("first", 0.0), ("second", 8.0), ("third", 16.0)]
            );
        }

        #[test]
        fn deterministic() {
            let events = [
                monday("A", (9, 0), (10, 0)),
                monday("B", (9, 30), (11, 0)),
                monday("C", (9, 30), (10, 0)),
                monday("D", (14, 0), (15, 0)),
            ];
            assert_eq!(run(&events), run(&events));
        }
    }

    mod skipping {
        use super::*;

        #[test]
        fn empty_day() {
            assert!(run(&[]).is_empty());
        }

        #[test]
        fn all_day_events_are_not_positioned() {
            let day = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
            let positioned = run(&[
                CalendarEvent::all_day("holiday", "Holiday", day, day.succ_opt().unwrap()),
                monday("A", (9, 0), (10, 0)),
            ]);
            assert_eq!(positioned.len(), 1);
            assert_eq!(positioned[0].event.id, "A");
            // The skipped all-day event sorted first and used z-index 0.
            assert_eq!(positioned[0].z_index, 1);
        }

        #[test]
        fn mixed_bounds_are_skipped() {
            let day = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
            let mut broken = monday("broken", (9, 0), (10, 0));
            broken.end = crate::time::EventTime::AllDay(day);
            let positioned = run(&[broken, monday("ok", (11, 0), (12, 0))]);
            assert_eq!(offsets(&positioned), [("ok", 0.0)]);
        }
    }
}
