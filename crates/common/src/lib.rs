//! Shared helpers for the delivery target workspace: logging setup and
//! pagination windows.

pub mod pagination;
pub mod utils;
