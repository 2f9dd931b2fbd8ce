//! Database Models
//!
//! Row types matching the SurrealDB schema, plus their Create/Update DTOs.
//! Record IDs serialize as "table:id" strings via [`serde_thing`].

// Serde helpers
pub mod serde_thing;

// Staff
pub mod profile;

// Orders
pub mod order;
pub mod order_item;
pub mod timeline;

// Workflow support
pub mod notification;
pub mod vendor;

// Operational
pub mod activity_log;
pub mod file_ref;
pub mod import_cache;

// HR
pub mod hr;

// Re-exports
pub use activity_log::ActivityLog;
pub use file_ref::FileRef;
pub use hr::{
    Holiday, HolidayCreate, LeaveBalance, LeaveRequest, LeaveRequestCreate, LeaveType,
    LeaveTypeCreate, LeaveTypeUpdate, PayrollRecord, PayrollRecordCreate,
};
pub use import_cache::ImportCacheRow;
pub use notification::Notification;
pub use order::{
    CustomerSnapshot, DuplicateVerdict, Order, OrderCreate, OrderId, OrderUpdate, OrderView,
};
pub use order_item::{
    DispatchDecision, DispatchRecord, FollowUpNote, OrderItem, OrderItemCreate, OrderItemId,
    OutsourceRecord, SubstagePlan,
};
pub use profile::{Profile, ProfileCreate, ProfileId, ProfileResponse, ProfileUpdate};
pub use timeline::TimelineEntry;
pub use vendor::{Vendor, VendorCreate, VendorId, VendorUpdate};
