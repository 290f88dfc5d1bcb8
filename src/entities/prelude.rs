pub use super::assignment_notes::Entity as AssignmentNotes;
pub use super::assignment_tasks::Entity as AssignmentTasks;
pub use super::assignments::Entity as Assignments;
pub use super::courses::Entity as Courses;
pub use super::notes::Entity as Notes;
pub use super::users::Entity as Users;
