use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub title: String,
    pub description: Option<String>,
    pub deadline: String,
    pub completed: bool,
    /// JSON array of strings
    pub tags: Option<String>,
    /// JSON array of strings
    pub resources: Option<String>,
    pub recurring: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Courses,
    #[sea_orm(has_many = "super::assignment_tasks::Entity")]
    AssignmentTasks,
    #[sea_orm(has_many = "super::assignment_notes::Entity")]
    AssignmentNotes,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Courses.def()
    }
}

impl Related<super::assignment_tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignmentTasks.def()
    }
}

impl Related<super::assignment_notes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignmentNotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
