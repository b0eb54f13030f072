//! API Routes
//!
//! Route handlers organized by functionality.

pub mod catalog;
pub mod charts;
pub mod health;
pub mod refresh;
