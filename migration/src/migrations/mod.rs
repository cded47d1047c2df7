pub mod m202510010001_create_departments;
pub mod m202510010002_create_classrooms;
pub mod m202510010003_create_profiles;
pub mod m202510010004_create_activities;
pub mod m202510010005_create_announcements;
pub mod m202510010006_create_attendance_records;
