//! Batch operations

mod add;
mod delete;
mod list;

pub use add::AddBatch;
pub use delete::DeleteBatch;
pub use list::ListBatches;
