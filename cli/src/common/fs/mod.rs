//! # Helpdesk Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//!
//! - **`context`**: builds the bounded app context blob from a directory of
//!   application files (`load_app_context`).
//!

/// App context loading.
pub mod context;
