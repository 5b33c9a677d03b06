//! Statement tree produced by the syntax stage

pub mod expression;
pub mod nodes;
pub mod value;
pub mod visitor;

pub use expression::PolicyExpr;
pub use nodes::{nest_statements, PathSegment, Payload, StatementNode};
pub use value::{
    Administrator, ExtendedCommunity, ExtendedCommunityKind, StandardCommunity, Value,
};
pub use visitor::{walk, StatementVisitor};
