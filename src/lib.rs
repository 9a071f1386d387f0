//! Weeek-sync - PR / task-tracker synchronization
//!
//! Keeps Weeek task records in step with the GitHub pull request lifecycle:
//! - Refs: task reference extraction from branch names and PR bodies
//! - Weeek: task tracker API client (tasks, tags, board columns)
//! - GitHub: pull request API client (title rewrite, comments)
//! - Sync: the two orchestrated passes, PR annotation and release roll-up
//!
//! Each invocation is one stateless pass over one event; nothing is persisted
//! or retried across runs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod refs;
pub mod sync;
pub mod weeek;

pub use config::{AnnotateContext, GithubConfig, ReleaseContext, WeeekConfig};
pub use error::{Error, Result};
pub use github::{GithubClient, PrApi};
pub use refs::{extract_refs, first_ref};
pub use sync::{Outcome, SyncReport};
pub use weeek::{TaskApi, WeeekClient};
