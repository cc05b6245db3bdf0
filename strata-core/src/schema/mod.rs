mod parse;
mod schema;

pub use parse::*;
pub use schema::*;
