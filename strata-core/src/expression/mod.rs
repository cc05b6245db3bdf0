mod call;
mod condition;
mod expression;
mod identifier;
mod op_precedence;
mod operator;
mod parameter;

pub use call::*;
pub use condition::*;
pub use expression::*;
pub use identifier::*;
pub use op_precedence::*;
pub use operator::*;
pub use parameter::*;
