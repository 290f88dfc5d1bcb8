use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Every listing query filters on the owning user, so each owned table gets
/// an index on `user_id`.
const OWNER_INDEXES: [(&str, &str); 3] = [
    ("idx_courses_user_id", "courses"),
    ("idx_assignments_user_id", "assignments"),
    ("idx_notes_user_id", "notes"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in OWNER_INDEXES {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Alias::new(table))
                        .col(Alias::new("user_id"))
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_assignments_course_id")
                    .table(Alias::new("assignments"))
                    .col(Alias::new("course_id"))
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in OWNER_INDEXES {
            manager
                .drop_index(
                    Index::drop()
                        .name(name)
                        .table(Alias::new(table))
                        .to_owned(),
                )
                .await?;
        }

        manager
            .drop_index(
                Index::drop()
                    .name("idx_assignments_course_id")
                    .table(Alias::new("assignments"))
                    .to_owned(),
            )
            .await
    }
}
