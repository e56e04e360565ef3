//! `SeaORM` entities for the task store.

pub mod prelude;

pub mod sea_orm_active_enums;
pub mod todo_task;
