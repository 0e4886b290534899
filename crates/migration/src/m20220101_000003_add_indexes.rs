use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Marks: lookups by owning student
        manager
            .create_index(
                Index::create()
                    .name("idx_marks_student")
                    .table(Marks::Table)
                    .col(Marks::StudentId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_marks_student").table(Marks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Marks { Table, StudentId }
