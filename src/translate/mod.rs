pub mod client;
pub mod interface;

pub use client::*;
pub use interface::*;
