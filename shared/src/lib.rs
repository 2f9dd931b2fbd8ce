//! Shared vocabulary for the Pressroom order-management system.
//!
//! This crate holds everything both the server and its clients need to agree
//! on, without pulling in the server's database or HTTP stack:
//!
//! - **workflow**: closed enums for stages, departments, statuses, substages,
//!   outsource stages and priorities, plus the pure derivations over them
//!   (priority from delivery date, the canonical stage→department mapping).
//! - **sync**: payloads for the realtime change feed.
//! - **util**: timestamp and ID helpers.

pub mod sync;
pub mod util;
pub mod workflow;

pub use sync::{SyncPayload, SyncStatus};
pub use workflow::{
    ApprovalStatus, Department, ItemStatus, OrderSource, OutsourceStage, PaymentStatus, Priority,
    Role, Stage, Substage, SubstageStatus, priority_for,
};
