//! Cascading unit picker.
//!
//! Renders the organization as a row of dependent "pick a unit at level L"
//! controls, kept in sync with an externally supplied value and reporting
//! every change through a single callback.

pub mod cascade;

pub use cascade::{CascadeSelector, SelectorLevel};

use thiserror::Error;

/// Rejected selector interactions. The selection path is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("Level {level} is not rendered (visible levels: {visible})")]
    InvalidLevel { level: usize, visible: usize },

    #[error("Unit '{unit_id}' is not an option at level {level}")]
    InvalidOption { level: usize, unit_id: String },

    #[error("Selector is fixed to a single unit")]
    Fixed,
}
