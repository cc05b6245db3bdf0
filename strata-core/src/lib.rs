mod builder;
mod context;
mod criteria;
mod data;
mod data_type;
mod error;
mod expression;
mod metadata;
mod reduce;
mod schema;
mod source;
mod statement;
mod translate;
mod util;
mod value;
mod writer;

pub use ::anyhow::Context as ErrorContext;
pub use builder::*;
pub use context::*;
pub use criteria::*;
pub use data::*;
pub use data_type::*;
pub use error::*;
pub use expression::*;
pub use metadata::*;
pub use reduce::*;
pub use schema::*;
pub use source::*;
pub use statement::*;
pub use translate::*;
pub use util::*;
pub use value::*;
pub use writer::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
