//! Subject operations

mod add;
mod delete;
mod list;

pub use add::AddSubject;
pub use delete::DeleteSubject;
pub use list::ListSubjects;
