use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AssignmentService, AuthService, CourseService, NoteService, ProfileService,
    SeaOrmAssignmentService, SeaOrmAuthService, SeaOrmCourseService, SeaOrmNoteService,
    SeaOrmProfileService, TokenSigner,
};

/// Long-lived services shared by every request handler.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub course_service: Arc<dyn CourseService>,

    pub assignment_service: Arc<dyn AssignmentService>,

    pub note_service: Arc<dyn NoteService>,

    pub profile_service: Arc<dyn ProfileService>,
}

impl SharedState {
    /// Opens the database (running migrations) and wires up the services.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let signer = TokenSigner::from_config(&config.security);

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
            signer,
        )) as Arc<dyn AuthService>;

        let course_service =
            Arc::new(SeaOrmCourseService::new(store.clone())) as Arc<dyn CourseService>;

        let assignment_service =
            Arc::new(SeaOrmAssignmentService::new(store.clone())) as Arc<dyn AssignmentService>;

        let note_service = Arc::new(SeaOrmNoteService::new(store.clone())) as Arc<dyn NoteService>;

        let profile_service = Arc::new(SeaOrmProfileService::new(
            store.clone(),
            config.uploads.clone(),
        )) as Arc<dyn ProfileService>;

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            course_service,
            assignment_service,
            note_service,
            profile_service,
        }
    }
}
