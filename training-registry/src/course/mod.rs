//! Course operations

mod add;
mod delete;
mod list;

pub use add::AddCourse;
pub use delete::DeleteCourse;
pub use list::ListCourses;
