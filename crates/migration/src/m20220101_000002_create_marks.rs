//! Create `marks` table with FK to `students`.
//!
//! Deleting a student removes its marks (ON DELETE CASCADE).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Marks::Table)
                    .if_not_exists()
                    .col(pk_auto(Marks::Id))
                    .col(integer(Marks::StudentId).not_null())
                    .col(string_len(Marks::Subject, 128).not_null())
                    .col(double(Marks::Marks).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_marks_student")
                            .from(Marks::Table, Marks::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Marks::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Marks { Table, Id, StudentId, Subject, Marks }

#[derive(DeriveIden)]
enum Students { Table, Id }
