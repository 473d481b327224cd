//! Core types and filtering logic for repotally.
//!
//! This crate provides the fundamental data structures shared across the
//! repotally ecosystem (repositories, components, assets) plus the pure
//! predicate machinery: date expression parsing, wildcard matching, and
//! component filter compilation.

pub mod datespec;
mod error;
mod filter;
mod model;
pub mod wildcard;

pub use error::ConfigError;
pub use filter::{ComponentFilter, FilterCriteria};
pub use model::{Asset, Component, ComponentPage, Repository, RepositoryType};
