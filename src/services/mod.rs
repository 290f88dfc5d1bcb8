pub mod patch;
pub mod token;
pub mod transfer;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, Credentials, TokenResponse};
pub use auth_service_impl::SeaOrmAuthService;

pub mod course_service;
pub mod course_service_impl;
pub use course_service::{CourseError, CourseService};
pub use course_service_impl::SeaOrmCourseService;

pub mod assignment_service;
pub mod assignment_service_impl;
pub use assignment_service::{AssignmentError, AssignmentProgress, AssignmentService};
pub use assignment_service_impl::SeaOrmAssignmentService;

pub mod note_service;
pub mod note_service_impl;
pub use note_service::{NoteError, NoteService};
pub use note_service_impl::SeaOrmNoteService;

pub mod profile_service;
pub mod profile_service_impl;
pub use profile_service::{ProfileError, ProfileService};
pub use profile_service_impl::SeaOrmProfileService;

pub use token::{CurrentUser, TokenSigner};
