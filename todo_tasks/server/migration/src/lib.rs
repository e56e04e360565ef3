pub use sea_orm_migration::prelude::*;

mod m20250525_071334_create_todo_tasks_table;
mod m20250601_120000_add_created_at_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250525_071334_create_todo_tasks_table::Migration),
            Box::new(m20250601_120000_add_created_at_index::Migration),
        ]
    }
}
