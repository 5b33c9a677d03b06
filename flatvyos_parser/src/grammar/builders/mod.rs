//! Builder functions for `set` statement productions

pub mod atomic;
pub mod blocks;
pub mod communities;
pub mod expressions;
pub mod helpers;

pub use atomic::{
    convert_token, expect_class, parse_name, parse_value, strip_matching_quotes, Parser,
};
pub use blocks::parse_tail;
pub use communities::{parse_extended_community, parse_set_community};
pub use expressions::{parse_policy_expression, parse_policy_expression_with_limit};
