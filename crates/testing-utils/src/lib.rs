//! # Allocator Testing Utils
//!
//! Shared testing utilities for the page allocation workspace.
//!
//! ## Features
//!
//! - **Test Data Builders**: workers, files, tracked files and tasks with sensible defaults
//! - **Mock Repositories**: recording `UserRepository`/`TaskRepository` doubles that can be told to fail
//! - **Invariant Helpers**: assertions for the properties every distribution must satisfy
//!
//! ## Usage
//!
//! ```toml
//! [dev-dependencies]
//! allocator-testing-utils = { path = "../testing-utils" }
//! ```
//!
//! ```rust
//! use allocator_testing_utils::{files, workers};
//!
//! let pool = workers(2);
//! let job_files = files(&[5, 3, 3]);
//! assert_eq!(pool.len(), 2);
//! assert_eq!(job_files[0].pages_number, 5);
//! ```

pub mod builders;
pub mod helpers;
pub mod mocks;

pub use builders::*;
pub use helpers::*;
pub use mocks::*;
