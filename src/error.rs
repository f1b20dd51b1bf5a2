//! Error types for text parsing.
//!
//! Parse failures are local to the text surface: they never change the
//! picked color and never fire a color-changed event.

use thiserror::Error;

/// Failure to interpret text typed into the color text field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Nothing but whitespace (or a lone `#`) was entered.
    #[error("color text is empty")]
    Empty,

    /// A character outside `0-9a-fA-F` in a hex color.
    #[error("invalid hex digit {0:?}")]
    InvalidHexDigit(char),

    /// Hex colors must have 3, 4, 6 or 8 digits.
    #[error("hex color must have 3, 4, 6 or 8 digits, got {0}")]
    InvalidHexLength(usize),

    /// A tuple component that is not a number.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    /// Tuples carry three (RGB) or four (RGBA) components.
    #[error("expected 3 or 4 components, got {0}")]
    ComponentCount(usize),

    /// A tuple component outside the range the active mode accepts.
    #[error("component {value} is outside {min}..={max}")]
    OutOfRange { value: f64, min: f64, max: f64 },
}
