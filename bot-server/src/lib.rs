//! Complaint intake and resolution-tracking bot server
//!
//! A Telegram bot for a learning center: parents' complaints are collected
//! through a guided private-chat form, stored as rows of a Google Sheet,
//! and walked through a fixed lifecycle by staff in three coordinated chat
//! groups (intake, resolution, leadership). A scheduler escalates stuck
//! complaints and posts weekly and monthly reports.

pub mod core;
pub mod dispatch;
pub mod gateway;
pub mod intake;
pub mod lifecycle;
pub mod scheduler;
pub mod stats;
pub mod store;
pub mod utils;

#[cfg(test)]
pub mod testing;
