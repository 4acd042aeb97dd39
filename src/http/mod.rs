//! HTTP transport layer
//!
//! Terminates HTTP for the single RPC endpoint and owns the 404 fallbacks.

pub mod handlers;
