use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum TodoTasks {
    Table,
    Id,
    Title,
    Description,
    Status,
    CreatedAt,
    CompletedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TodoTasks::Table)
                    .if_not_exists()
                    .col(pk_auto(TodoTasks::Id))
                    .col(string_len(TodoTasks::Title, 100))
                    .col(string_len_null(TodoTasks::Description, 500))
                    .col(integer(TodoTasks::Status))
                    .col(timestamp_with_time_zone(TodoTasks::CreatedAt))
                    .col(timestamp_with_time_zone_null(TodoTasks::CompletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TodoTasks::Table).to_owned())
            .await
    }
}
