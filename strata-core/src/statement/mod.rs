mod base;
mod delete;
mod execute;
mod insert;
mod returning;
mod select;
mod statement;
mod update;
mod upsert;

pub use base::*;
pub use delete::*;
pub use execute::*;
pub use insert::*;
pub use returning::*;
pub use select::*;
pub use statement::*;
pub use update::*;
pub use upsert::*;
