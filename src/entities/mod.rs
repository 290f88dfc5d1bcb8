pub mod prelude;

pub mod assignment_notes;
pub mod assignment_tasks;
pub mod assignments;
pub mod courses;
pub mod notes;
pub mod users;
