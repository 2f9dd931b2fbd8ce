//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - login and session
//! - [`orders`] - order intake, listing, import
//! - [`items`] - item workflow actions
//! - [`timeline`] - per-order / per-item audit trail
//! - [`vendors`] - outsource vendor management
//! - [`notifications`] - per-user notification feed
//! - [`files`] - artifact upload and download
//! - [`profiles`] - staff account management (admin)
//! - [`hr`] - leave, holidays, payroll
//! - [`activity`] - operational activity log (admin)
//! - [`sync`] - change-feed version status

pub mod activity;
pub mod auth;
pub mod files;
pub mod health;
pub mod hr;
pub mod items;
pub mod notifications;
pub mod orders;
pub mod profiles;
pub mod sync;
pub mod timeline;
pub mod vendors;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
