//! signstamp-server
//!
//! Stamps a generated handwritten-style signature image onto a page of an
//! uploaded PDF.
//!
//! # Modules
//!
//! - `placement`: fit-to-box scaling, coordinate conversion and the placement pipeline
//! - `pdf`: document abstraction and its lopdf implementation
//! - `signature`: signature image acquisition from the third-party API
//! - `processor`: download + placement for a single upload
//! - `routes`: axum HTTP surface

pub mod config;
pub mod error;
pub mod pdf;
pub mod placement;
pub mod processor;
pub mod routes;
pub mod signature;
pub mod state;
