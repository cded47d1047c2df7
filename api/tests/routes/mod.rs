mod activities;
mod announcements;
mod classrooms;
mod departments;
mod health_test;
mod profiles;
