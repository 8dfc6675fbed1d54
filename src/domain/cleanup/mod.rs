mod duplicate_rule;
mod report;

pub use duplicate_rule::*;
pub use report::*;
