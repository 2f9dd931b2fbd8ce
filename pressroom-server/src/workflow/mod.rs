//! Workflow engine
//!
//! Pure transition logic plus the best-effort side-effect layer. Handlers
//! load rows, run a function from here against them, persist, then fire the
//! effects.
//!
//! - [`transition`] - generic moves, approvals, substage completion
//! - [`outsource`] - the vendor sub-machine
//! - [`dispatch`] - dispatch decision and finalization
//! - [`visibility`] - role-based filters
//! - [`notify`] - audience computation
//! - [`duplicate`] - advisory duplicate check (fail-open)
//! - [`effects`] - timeline / notification / activity-log writes

pub mod dispatch;
pub mod duplicate;
pub mod effects;
pub mod notify;
pub mod outsource;
pub mod transition;
pub mod visibility;

pub use transition::{MoveRequest, apply_approval, apply_move, complete_substage};
