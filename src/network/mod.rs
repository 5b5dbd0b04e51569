//! HTTP networking module
//!
//! Outgoing requests are only made by the connectivity probe.

mod client;

pub use client::{user_agent, HttpClient};
