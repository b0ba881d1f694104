//! Student operations

mod add;
mod delete;
mod list;

pub use add::AddStudent;
pub use delete::DeleteStudent;
pub use list::ListStudents;
