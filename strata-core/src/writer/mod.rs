mod context;
mod delete;
mod execute;
mod insert;
mod select;
mod sql_writer;
mod update;
mod upsert;

pub use context::*;
pub use delete::*;
pub use execute::*;
pub use insert::*;
pub use select::*;
pub use sql_writer::*;
pub use update::*;
pub use upsert::*;
