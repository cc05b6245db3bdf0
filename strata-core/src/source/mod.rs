mod aliaser;
mod collection;
mod join;

pub use aliaser::*;
pub use collection::*;
pub use join::*;
