//! Server services
//!
//! - [`ChangeFeedService`] - Socket.IO change feed
//! - [`FileStorageService`] - upload storage under the work dir

pub mod change_feed;
pub mod file_storage;

pub use change_feed::ChangeFeedService;
pub use file_storage::FileStorageService;
