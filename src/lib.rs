//! scopegate - change-scoped pre-commit checks
//!
//! scopegate reads the files staged for a commit, sorts them into named
//! scopes by path pattern (e.g. `api/*.py`, `web/`), and runs only the
//! checks of the scopes that were touched. The first failing check aborts
//! the commit.
//!
//! ## Pipeline
//!
//! 1. **Classify**: every `[[scope]]` whose patterns match at least one
//!    staged path is triggered.
//! 2. **Run**: triggered scopes run in declaration order, their checks one
//!    at a time. A non-zero exit stops everything.
//! 3. **Test impact** (optional per scope): changed source files must pass
//!    the unit test sitting next to them; a missing test is only a warning.

pub mod config;
pub mod dispatch;
pub mod domain;
mod error;
pub mod git;

pub use domain::*;
pub use error::DispatchError;
