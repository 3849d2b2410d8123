//! Complaint intake — the guided form
//!
//! Private-chat flow that collects a complaint step by step, previews it,
//! and on confirmation writes the record and announces it to the intake
//! group.

pub mod flow;
pub mod session;

pub use flow::{MENU_INSTRUCTION, MENU_NEW_COMPLAINT, MENU_STATISTICS};
pub use session::{Draft, FormStep, SessionStore};
