use sea_orm_migration::prelude::*;

mod m20260101_000001_create_schools;
mod m20260101_000002_create_users;
mod m20260102_000001_create_students;
mod m20260103_000001_create_marks;
mod m20260104_000001_create_alerts;
mod m20260105_000001_create_education_content;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_schools::Migration),
            Box::new(m20260101_000002_create_users::Migration),
            Box::new(m20260102_000001_create_students::Migration),
            Box::new(m20260103_000001_create_marks::Migration),
            Box::new(m20260104_000001_create_alerts::Migration),
            Box::new(m20260105_000001_create_education_content::Migration),
        ]
    }
}
