use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202510010001_create_departments::Migration),
            Box::new(migrations::m202510010002_create_classrooms::Migration),
            Box::new(migrations::m202510010003_create_profiles::Migration),
            Box::new(migrations::m202510010004_create_activities::Migration),
            Box::new(migrations::m202510010005_create_announcements::Migration),
            Box::new(migrations::m202510010006_create_attendance_records::Migration),
        ]
    }
}
