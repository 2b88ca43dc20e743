//! Core data types for the pulse monitoring bot.

pub mod notify;
pub mod price;
pub mod record;
pub mod tvl;

pub use notify::*;
pub use price::*;
pub use record::*;
pub use tvl::*;
