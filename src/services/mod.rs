//! Services module - filesystem logic behind the source-path workflow.
//!
//! # Components
//!
//! - [`DirectorySetValidator`]: decides whether a directory holds the expected
//!   game layout, redirecting into the `USRDIR` marker directory when present.
//! - [`copy_tree`] / [`move_tree`]: bulk relocation of the source tree into the
//!   project, with per-file progress reporting.
//!
//! Neither component talks to the operator or the config file; the
//! [`resolver`](crate::resolver) drives both.

pub mod transfer;
pub mod validation;

pub use transfer::{TransferError, TransferSummary, copy_tree, move_tree};
pub use validation::{
    DirectorySetValidator, LayoutMatch, all_present, missing_dirs, require_directory,
};
