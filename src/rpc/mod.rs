//! JSON-RPC 2.0 protocol layer
//!
//! Envelope validation, method dispatch, and the fixed error-code mapping.

pub mod dispatch;
pub mod envelope;
