//! Grammar for flat VyOS `set` statements: the statement tree, the
//! `(scope, keyword)` dispatch table and the builders that walk it

pub mod ast;
pub mod builders;
pub mod table;

pub use ast::{
    nest_statements, walk, PathSegment, Payload, PolicyExpr, StatementNode, StatementVisitor,
    Value,
};
pub use table::{Handler, Production, Scope, ValueClass};
