//! Shared types for the complaint intake bot
//!
//! Common types used by the server and its tests: the complaint record,
//! status lifecycle, catalogs (branches/categories) and the inline-action
//! payload format.

pub mod callback;
pub mod catalog;
pub mod complaint;

// Re-exports
pub use callback::CallbackPayload;
pub use catalog::{BRANCHES, Category};
pub use complaint::{Complaint, ComplaintStatus, MediaKind, MediaRef, Submitter, columns};
