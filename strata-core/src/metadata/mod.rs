mod catalog;
mod command;
mod entity;
mod property;

pub use catalog::*;
pub use command::*;
pub use entity::*;
pub use property::*;
