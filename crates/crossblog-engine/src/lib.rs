//! Crossblog Engine - article operations
//!
//! Provides the article controller, which maps repository results to
//! transport-neutral outcomes. Each controller owns one repository (one
//! unit of work) and lives for a single request.

pub mod controller;
pub mod outcome;

pub use controller::ArticlesController;
pub use outcome::Outcome;
