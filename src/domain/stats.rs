use serde::Serialize;

use super::{Assignment, percentage};

/// Per-user counters shown on the profile page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_courses: usize,
    pub total_assignments: usize,
    pub completed_assignments: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completion_rate: u8,
    pub task_completion_rate: u8,
}

/// Aggregates counts over one user's assignments.
///
/// `completed_assignments` follows the assignment's own `completed` flag, not
/// its task progress.
#[must_use]
pub fn compute_stats(total_courses: usize, assignments: &[Assignment]) -> UserStats {
    let total_assignments = assignments.len();
    let completed_assignments = assignments.iter().filter(|a| a.completed).count();
    let total_tasks = assignments.iter().map(|a| a.tasks.len()).sum();
    let completed_tasks = assignments.iter().map(Assignment::done_task_count).sum();

    UserStats {
        total_courses,
        total_assignments,
        completed_assignments,
        total_tasks,
        completed_tasks,
        completion_rate: percentage(completed_assignments, total_assignments),
        task_completion_rate: percentage(completed_tasks, total_tasks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, Task, TaskStatus, UserId};

    fn assignment(completed: bool, statuses: &[TaskStatus]) -> Assignment {
        Assignment {
            id: crate::domain::new_id(),
            title: "A".to_string(),
            description: None,
            deadline: "2024-01-01".to_string(),
            course_id: "c".to_string(),
            completed,
            tags: None,
            resources: None,
            recurring: None,
            user_id: UserId::new("u"),
            tasks: statuses
                .iter()
                .map(|s| Task {
                    id: crate::domain::new_id(),
                    headline: "t".to_string(),
                    description: String::new(),
                    difficulty: Difficulty::Easy,
                    status: *s,
                    user_id: UserId::new("u"),
                })
                .collect(),
            notes: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn empty_user_has_zero_rates() {
        let stats = compute_stats(0, &[]);
        assert_eq!(stats, UserStats::default());
    }

    #[test]
    fn completion_uses_flag_not_tasks() {
        use TaskStatus::{Done, ToDo};
        let assignments = vec![
            assignment(true, &[ToDo]),
            assignment(false, &[Done, Done]),
            assignment(false, &[]),
        ];

        let stats = compute_stats(2, &assignments);
        assert_eq!(stats.total_courses, 2);
        assert_eq!(stats.total_assignments, 3);
        assert_eq!(stats.completed_assignments, 1);
        assert_eq!(stats.completion_rate, 33);
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.completed_tasks, 2);
        assert_eq!(stats.task_completion_rate, 67);
    }

    #[test]
    fn completed_tasks_matches_done_count_for_mixed_statuses() {
        use TaskStatus::{Done, InProgress, Rejected, ToDo};
        let all = [ToDo, InProgress, Done, Rejected];
        let assignments: Vec<Assignment> = (0..all.len())
            .map(|i| assignment(false, &all[..=i]))
            .collect();

        let expected_done = assignments
            .iter()
            .flat_map(|a| a.tasks.iter())
            .filter(|t| t.status == Done)
            .count();

        let stats = compute_stats(1, &assignments);
        assert_eq!(stats.completed_tasks, expected_done);
        assert_eq!(stats.total_tasks, 1 + 2 + 3 + 4);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(compute_stats(1, &[])).unwrap();
        assert_eq!(json["totalCourses"], 1);
        assert_eq!(json["taskCompletionRate"], 0);
    }
}
