//! This module defines the error types used by the `campo-navigation` crate.

#![warn(missing_docs)]

/// Error type for navigation operations.
///
/// This enum encapsulates the errors that can occur while constructing grids
/// or validating sensor input. All variants are configuration or input
/// errors surfaced at startup or at the collaborator boundary, never during
/// a control tick.
#[derive(Debug, PartialEq)]
pub enum NavigationError {
    /// Error for invalid cell size.
    /// This variant is returned when a cell size is provided that is not positive and finite.
    InvalidCellSize(&'static str),
    /// Error for invalid grid size.
    /// This variant is returned when a grid size of zero is provided.
    InvalidGridSize(&'static str),
    /// Error for a malformed scan.
    /// This variant is returned when range and angle sequences differ in length.
    MismatchedScan(&'static str),
}

impl core::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NavigationError::InvalidCellSize(msg) => write!(f, "Invalid cell size: {}", msg),
            NavigationError::InvalidGridSize(msg) => write!(f, "Invalid grid size: {}", msg),
            NavigationError::MismatchedScan(msg) => write!(f, "Mismatched scan: {}", msg),
        }
    }
}

impl core::error::Error for NavigationError {}
