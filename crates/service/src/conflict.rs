//! Schedule overlap detection.
//!
//! Blocks are half-open intervals `[start, end)`: a block ending at 09:00 and
//! another starting at 09:00 do not collide.

use models::schedule_block;
use sea_orm::prelude::Time;
use uuid::Uuid;

pub fn overlaps(start: Time, end: Time, existing_start: Time, existing_end: Time) -> bool {
    start < existing_end && end > existing_start
}

/// First block in `existing` that overlaps `[start, end)`, skipping `exclude`.
///
/// Callers pass the blocks of a single teacher on a single day.
pub fn find_conflict<'a>(
    start: Time,
    end: Time,
    existing: &'a [schedule_block::Model],
    exclude: Option<Uuid>,
) -> Option<&'a schedule_block::Model> {
    existing
        .iter()
        .filter(|b| Some(b.id) != exclude)
        .find(|b| overlaps(start, end, b.start_time, b.end_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn t(h: u32, m: u32) -> Time {
        Time::from_hms_opt(h, m, 0).unwrap()
    }

    fn block(start: Time, end: Time) -> schedule_block::Model {
        let now = Utc::now().into();
        schedule_block::Model {
            id: Uuid::new_v4(),
            teacher_id: Uuid::nil(),
            course_id: Uuid::nil(),
            subject_id: Uuid::nil(),
            day: "monday".into(),
            start_time: start,
            end_time: end,
            room: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!overlaps(t(9, 0), t(10, 0), t(8, 0), t(9, 0)));
        assert!(!overlaps(t(8, 0), t(9, 0), t(9, 0), t(10, 0)));
    }

    #[test]
    fn partial_nested_and_identical_overlap() {
        assert!(overlaps(t(8, 30), t(9, 30), t(8, 0), t(9, 0)));
        assert!(overlaps(t(8, 15), t(8, 45), t(8, 0), t(9, 0)));
        assert!(overlaps(t(7, 0), t(10, 0), t(8, 0), t(9, 0)));
        assert!(overlaps(t(8, 0), t(9, 0), t(8, 0), t(9, 0)));
    }

    #[test]
    fn finds_first_conflict_and_skips_self() {
        let existing = vec![block(t(8, 0), t(9, 0)), block(t(10, 0), t(11, 0))];
        let hit = find_conflict(t(10, 30), t(11, 30), &existing, None).unwrap();
        assert_eq!(hit.id, existing[1].id);

        assert!(find_conflict(t(9, 0), t(10, 0), &existing, None).is_none());
        assert!(find_conflict(t(8, 0), t(8, 50), &existing, Some(existing[0].id)).is_none());
    }
}
