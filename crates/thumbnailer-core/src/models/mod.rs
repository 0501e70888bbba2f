//! Data models for the thumbnail pipeline
//!
//! Every model here is transient: it is built for one notification delivery
//! and dropped when that delivery has been handled.

mod asset;
mod notification;
mod outcome;

pub use asset::*;
pub use notification::*;
pub use outcome::*;
