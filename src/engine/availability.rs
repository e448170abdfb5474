use crate::model::*;

// ── Availability Algorithm ────────────────────────────────────────

/// Bookings whose interval fully contains the query window, i.e. the window
/// fits entirely inside an existing booking. Boundary equality counts as
/// containment. Ordered by (floor, cabinet number, start time).
pub fn fully_busy(window: &TimeWindow, bookings: &[Booking]) -> Vec<Booking> {
    let mut hits: Vec<Booking> = bookings
        .iter()
        .filter(|b| b.window.contains(window))
        .cloned()
        .collect();
    hits.sort_by_key(Booking::busy_order);
    hits
}

/// Bookings that overlap the query window without fully containing it. The
/// overlap test is strict on both ends, so a booking ending exactly at the
/// window start is not an overlap. Each hit carries the clamped overlap
/// interval. Ordered like `fully_busy`.
pub fn partially_busy(window: &TimeWindow, bookings: &[Booking]) -> Vec<PartialOverlap> {
    let mut hits: Vec<PartialOverlap> = bookings
        .iter()
        .filter(|b| b.window.overlaps(window) && !b.window.contains(window))
        .map(|b| PartialOverlap {
            overlap: b.window.intersection(window),
            booking: b.clone(),
        })
        .collect();
    hits.sort_by_key(|p| p.booking.busy_order());
    hits
}

/// Cabinets with no booking overlapping the query window. Any overlap,
/// partial or full, excludes a cabinet; a cabinet with zero bookings on the
/// date is always free. Ordered by (floor, number).
pub fn free_cabinets(
    window: &TimeWindow,
    cabinets: &[Cabinet],
    bookings: &[Booking],
) -> Vec<Cabinet> {
    let mut free: Vec<Cabinet> = cabinets
        .iter()
        .filter(|c| {
            !bookings
                .iter()
                .any(|b| b.cabinet_id == c.id && b.window.overlaps(window))
        })
        .cloned()
        .collect();
    free.sort_by_key(|c| (c.floor, c.number));
    free
}

/// One cabinet's bookings for a day, ordered by start time. A single forward
/// scan pairs each entry with its successor to compute the idle gap; the last
/// entry has no successor and its gap is None.
///
/// Bookings for one cabinet and day never overlap each other (the assignment
/// table holds one binding per pair+cabinet), so the scan needs no merging.
pub fn schedule_with_gaps(bookings: &[Booking]) -> Vec<ScheduleEntry> {
    let mut day: Vec<Booking> = bookings.to_vec();
    day.sort_by_key(|b| b.window.start);

    let mut entries = Vec::with_capacity(day.len());
    for (i, booking) in day.iter().enumerate() {
        let next_start = day.get(i + 1).map(|n| n.window.start);
        entries.push(ScheduleEntry {
            duration_hours: booking.window.duration_hours(),
            next_booking_starts: next_start,
            gap_to_next_hours: next_start
                .map(|s| (s - booking.window.end).as_seconds_f64() / 3600.0),
            booking: booking.clone(),
        });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};
    use time::Time;
    use ulid::Ulid;

    fn cabinet(number: i32, floor: i32) -> Cabinet {
        Cabinet {
            id: Ulid::new(),
            number,
            floor,
            kind: "lecture".into(),
            description: None,
        }
    }

    fn booking(cab: &Cabinet, start: Time, end: Time) -> Booking {
        Booking {
            pair_id: Ulid::new(),
            cabinet_id: cab.id,
            cabinet_number: cab.number,
            floor: cab.floor,
            cabinet_kind: cab.kind.clone(),
            day: date!(2025 - 03 - 10),
            window: TimeWindow::new(start, end),
            user_id: Ulid::new(),
            reserved_by: "Ivanova".into(),
            user_priority: Priority::Lecturer,
            purpose: None,
        }
    }

    fn window(start: Time, end: Time) -> TimeWindow {
        TimeWindow::new(start, end)
    }

    // ── fully_busy ────────────────────────────────────────

    #[test]
    fn fully_busy_containment_boundaries_inclusive() {
        let c = cabinet(101, 1);
        let b = booking(&c, time!(09:00), time!(11:00));
        let hits = fully_busy(&window(time!(09:30), time!(10:30)), &[b.clone()]);
        assert_eq!(hits, vec![b.clone()]);

        // exact boundary match still contains
        let hits = fully_busy(&window(time!(09:00), time!(11:00)), &[b]);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn fully_busy_excludes_partial_overlap() {
        let c = cabinet(101, 1);
        let b = booking(&c, time!(09:00), time!(10:00));
        let hits = fully_busy(&window(time!(09:30), time!(10:30)), &[b]);
        assert!(hits.is_empty());
    }

    #[test]
    fn fully_busy_ordering() {
        let second_floor = cabinet(201, 2);
        let low_number = cabinet(101, 1);
        let high_number = cabinet(105, 1);
        let bookings = vec![
            booking(&second_floor, time!(08:00), time!(18:00)),
            booking(&high_number, time!(08:00), time!(18:00)),
            booking(&low_number, time!(08:00), time!(18:00)),
        ];
        let hits = fully_busy(&window(time!(10:00), time!(11:00)), &bookings);
        let numbers: Vec<i32> = hits.iter().map(|b| b.cabinet_number).collect();
        assert_eq!(numbers, vec![101, 105, 201]);
    }

    #[test]
    fn fully_busy_empty_input() {
        let hits = fully_busy(&window(time!(09:00), time!(10:00)), &[]);
        assert!(hits.is_empty());
    }

    // ── partially_busy ────────────────────────────────────

    #[test]
    fn partially_busy_clamps_overlap() {
        let c = cabinet(101, 1);
        let b = booking(&c, time!(09:00), time!(10:00));
        let hits = partially_busy(&window(time!(09:30), time!(10:30)), &[b]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].overlap.start, time!(09:30));
        assert_eq!(hits[0].overlap.end, time!(10:00));
    }

    #[test]
    fn partially_busy_excludes_containing_booking() {
        let c = cabinet(101, 1);
        let b = booking(&c, time!(09:00), time!(11:00));
        let hits = partially_busy(&window(time!(09:30), time!(10:30)), &[b]);
        assert!(hits.is_empty());
    }

    #[test]
    fn booking_ending_at_window_start_not_overlapping() {
        let c = cabinet(101, 1);
        let b = booking(&c, time!(09:00), time!(10:00));
        let hits = partially_busy(&window(time!(10:00), time!(11:00)), &[b]);
        assert!(hits.is_empty());
    }

    #[test]
    fn booking_starting_at_window_end_not_overlapping() {
        let c = cabinet(101, 1);
        let b = booking(&c, time!(11:00), time!(12:00));
        let hits = partially_busy(&window(time!(10:00), time!(11:00)), &[b]);
        assert!(hits.is_empty());
    }

    #[test]
    fn window_spanning_booking_is_partial() {
        // window wider than the booking on both sides: overlap without
        // containment in either direction
        let c = cabinet(101, 1);
        let b = booking(&c, time!(09:30), time!(10:00));
        let hits = partially_busy(&window(time!(09:00), time!(11:00)), &[b]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].overlap.start, time!(09:30));
        assert_eq!(hits[0].overlap.end, time!(10:00));
    }

    #[test]
    fn fully_and_partially_busy_are_disjoint() {
        let c1 = cabinet(101, 1);
        let c2 = cabinet(102, 1);
        let c3 = cabinet(103, 1);
        let bookings = vec![
            booking(&c1, time!(09:00), time!(12:00)), // contains window
            booking(&c2, time!(09:00), time!(10:00)), // partial
            booking(&c3, time!(13:00), time!(14:00)), // disjoint
        ];
        let w = window(time!(09:30), time!(10:30));
        let full = fully_busy(&w, &bookings);
        let partial = partially_busy(&w, &bookings);
        assert_eq!(full.len(), 1);
        assert_eq!(partial.len(), 1);
        for p in &partial {
            assert!(full.iter().all(|f| f.pair_id != p.booking.pair_id));
        }
    }

    // ── free_cabinets ─────────────────────────────────────

    #[test]
    fn free_excludes_any_overlap() {
        let busy = cabinet(101, 1);
        let idle = cabinet(102, 1);
        let bookings = vec![booking(&busy, time!(09:00), time!(10:00))];
        let free = free_cabinets(
            &window(time!(09:30), time!(10:30)),
            &[busy.clone(), idle.clone()],
            &bookings,
        );
        assert_eq!(free, vec![idle]);
    }

    #[test]
    fn cabinet_without_bookings_always_free() {
        let idle = cabinet(102, 1);
        let free = free_cabinets(&window(time!(00:30), time!(23:30)), &[idle.clone()], &[]);
        assert_eq!(free, vec![idle]);
    }

    #[test]
    fn touching_booking_leaves_cabinet_free() {
        let c = cabinet(101, 1);
        let bookings = vec![booking(&c, time!(09:00), time!(10:00))];
        let free = free_cabinets(&window(time!(10:00), time!(11:00)), &[c.clone()], &bookings);
        assert_eq!(free, vec![c]);
    }

    #[test]
    fn back_to_back_bookings_block_spanning_window() {
        let c = cabinet(101, 1);
        let bookings = vec![
            booking(&c, time!(08:00), time!(09:00)),
            booking(&c, time!(09:00), time!(10:00)),
        ];
        let w = window(time!(08:30), time!(09:30));
        let free = free_cabinets(&w, &[c], &bookings);
        assert!(free.is_empty());

        // each booking overlaps without containing: both partial, none full
        assert_eq!(partially_busy(&w, &bookings).len(), 2);
        assert!(fully_busy(&w, &bookings).is_empty());
    }

    #[test]
    fn free_ordering_by_floor_then_number() {
        let cabs = vec![cabinet(205, 2), cabinet(101, 1), cabinet(110, 1)];
        let free = free_cabinets(&window(time!(09:00), time!(10:00)), &cabs, &[]);
        let keys: Vec<(i32, i32)> = free.iter().map(|c| (c.floor, c.number)).collect();
        assert_eq!(keys, vec![(1, 101), (1, 110), (2, 205)]);
    }

    // ── schedule_with_gaps ────────────────────────────────

    #[test]
    fn schedule_gap_scan() {
        let c = cabinet(101, 1);
        let bookings = vec![
            booking(&c, time!(10:30), time!(11:30)),
            booking(&c, time!(09:00), time!(10:00)),
        ];
        let entries = schedule_with_gaps(&bookings);
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].booking.window.start, time!(09:00));
        assert_eq!(entries[0].duration_hours, 1.0);
        assert_eq!(entries[0].next_booking_starts, Some(time!(10:30)));
        assert_eq!(entries[0].gap_to_next_hours, Some(0.5));

        assert_eq!(entries[1].duration_hours, 1.0);
        assert_eq!(entries[1].next_booking_starts, None);
        assert_eq!(entries[1].gap_to_next_hours, None);
    }

    #[test]
    fn schedule_back_to_back_zero_gap() {
        let c = cabinet(101, 1);
        let bookings = vec![
            booking(&c, time!(08:00), time!(09:00)),
            booking(&c, time!(09:00), time!(10:00)),
        ];
        let entries = schedule_with_gaps(&bookings);
        assert_eq!(entries[0].gap_to_next_hours, Some(0.0));
    }

    #[test]
    fn schedule_single_booking() {
        let c = cabinet(101, 1);
        let entries = schedule_with_gaps(&[booking(&c, time!(09:00), time!(10:45))]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].duration_hours, 1.75);
        assert_eq!(entries[0].gap_to_next_hours, None);
    }

    #[test]
    fn schedule_empty() {
        assert!(schedule_with_gaps(&[]).is_empty());
    }

    #[test]
    fn repeated_invocation_identical_output() {
        let c1 = cabinet(101, 1);
        let c2 = cabinet(303, 3);
        let bookings = vec![
            booking(&c2, time!(09:00), time!(12:00)),
            booking(&c1, time!(09:15), time!(09:45)),
        ];
        let w = window(time!(09:30), time!(10:30));
        assert_eq!(fully_busy(&w, &bookings), fully_busy(&w, &bookings));
        assert_eq!(partially_busy(&w, &bookings), partially_busy(&w, &bookings));
        assert_eq!(
            schedule_with_gaps(&bookings),
            schedule_with_gaps(&bookings)
        );
    }
}
