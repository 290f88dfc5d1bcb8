//! Completion percentages.
//!
//! Progress is always derived from the task list at the time of the call and
//! is never persisted.

use super::Task;

/// Rounds `100 * part / total` half-up to a whole percentage.
///
/// Returns 0 when `total` is 0. `part` is clamped to `total`.
///
/// # Examples
///
/// ```rust
/// use studydesk::domain::percentage;
///
/// assert_eq!(percentage(1, 3), 33);
/// assert_eq!(percentage(2, 3), 67);
/// assert_eq!(percentage(1, 8), 13);
/// assert_eq!(percentage(0, 0), 0);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let part = if part > total { total as u64 } else { part as u64 };
    let total = total as u64;
    // floor(100 * part / total + 1/2) without floating point
    ((200 * part + total) / (2 * total)) as u8
}

/// Percentage of `tasks` whose status is done.
#[must_use]
pub fn compute_progress(tasks: &[Task]) -> u8 {
    let done = tasks.iter().filter(|t| t.status.is_done()).count();
    percentage(done, tasks.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, TaskStatus, UserId};

    fn tasks(statuses: &[TaskStatus]) -> Vec<Task> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| Task {
                id: i.to_string(),
                headline: format!("task {i}"),
                description: String::new(),
                difficulty: Difficulty::Medium,
                status: *status,
                user_id: UserId::new("u1"),
            })
            .collect()
    }

    #[test]
    fn no_tasks_is_zero() {
        assert_eq!(compute_progress(&[]), 0);
    }

    #[test]
    fn thirds_round_half_up() {
        use TaskStatus::{Done, ToDo};
        assert_eq!(compute_progress(&tasks(&[Done, ToDo, ToDo])), 33);
        assert_eq!(compute_progress(&tasks(&[Done, Done, ToDo])), 67);
    }

    #[test]
    fn only_done_counts() {
        use TaskStatus::{Done, InProgress, Rejected, ToDo};
        assert_eq!(
            compute_progress(&tasks(&[Done, InProgress, Rejected, ToDo])),
            25
        );
        assert_eq!(compute_progress(&tasks(&[Rejected, Rejected])), 0);
        assert_eq!(compute_progress(&tasks(&[Done, Done])), 100);
    }

    #[test]
    fn exact_halves_round_up() {
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(3, 8), 38); // 37.5
        assert_eq!(percentage(1, 200), 1); // 0.5
    }

    #[test]
    fn matches_float_reference_for_small_lists() {
        for total in 1..=50usize {
            for done in 0..=total {
                #[allow(clippy::cast_precision_loss)]
                let expected = (100.0 * done as f64 / total as f64 + 0.5).floor();
                assert_eq!(f64::from(percentage(done, total)), expected, "{done}/{total}");
            }
        }
    }
}
