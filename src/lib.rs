//! Stranger Socks - anonymous one-on-one chat pairing over WebSockets
//!
//! This library provides the pairing engine that matches connected
//! strangers, plus the warp routes and operator tooling around it.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod handlers;
pub mod operator;

// Re-export main components
pub use config::*;
pub use constants::*;
