//! Core domain types for scopegate

mod change_set;
mod matcher;
mod result;
mod scope;

pub use change_set::CommitChangeSet;
pub use matcher::PathMatcher;
pub use result::{CheckFailure, DispatchResult, FailureKind, MissingTestWarning};
pub use scope::{CheckStep, Invocation, ScopeRule, TestImpact};
