//! Handle type for CAD objects
//!
//! Handles are unique 64-bit identifiers for all CAD objects in a document.
//! In tag data they travel as upper-case hexadecimal strings.

use crate::error::{DxfError, Result};
use std::fmt;

/// A unique identifier for CAD objects
///
/// Handles are 64-bit unsigned integers that uniquely identify
/// objects within a CAD document. Handle 0 is reserved and invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    /// The null/invalid handle (0)
    pub const NULL: Handle = Handle(0);

    /// Create a new handle from a u64 value
    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Check if this is a null/invalid handle
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Parse a handle from its hexadecimal tag representation
    pub fn from_hex(text: &str) -> Result<Self> {
        u64::from_str_radix(text.trim(), 16)
            .map(Handle)
            .map_err(|_| DxfError::Parse(format!("invalid handle: '{}'", text)))
    }

    /// Format the handle as an upper-case hexadecimal string
    pub fn to_hex(&self) -> String {
        format!("{:X}", self.0)
    }
}

impl Default for Handle {
    fn default() -> Self {
        Handle::NULL
    }
}

impl From<u64> for Handle {
    fn from(value: u64) -> Self {
        Handle(value)
    }
}

impl From<Handle> for u64 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_hex_roundtrip() {
        let h = Handle::from_hex("2E2").unwrap();
        assert_eq!(h.value(), 0x2E2);
        assert_eq!(h.to_hex(), "2E2");
    }

    #[test]
    fn test_handle_invalid_hex() {
        assert!(Handle::from_hex("XYZ").is_err());
    }

    #[test]
    fn test_handle_null() {
        assert!(Handle::NULL.is_null());
        assert!(!Handle::new(1).is_null());
    }
}
