//! Core types and trait definitions for the Object Design System.
//!
//! This crate has no HTTP or database dependencies.
//! Every other crate depends on it: stores implement [`store::EntityStore`],
//! the API and AI layers consume it.

pub mod chat;
pub mod dataset;
pub mod error;
pub mod hierarchy;
pub mod id;
pub mod object;
pub mod relation;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
