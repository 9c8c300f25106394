//! Core types shared across Crossblog facilities
//!
//! This crate provides foundational types used by the error, logging and
//! transport layers:
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
