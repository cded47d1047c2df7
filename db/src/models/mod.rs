pub mod activity;
pub mod announcement;
pub mod attendance_record;
pub mod classroom;
pub mod department;
pub mod profile;
pub mod targets;

pub use activity::Entity as Activity;
pub use announcement::Entity as Announcement;
pub use attendance_record::Entity as AttendanceRecord;
pub use classroom::Entity as Classroom;
pub use department::Entity as Department;
pub use profile::Entity as Profile;
