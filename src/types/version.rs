//! Drawing format revisions
//!
//! A single enumerated revision flag threads through the grouper, the
//! loader/exporter and the factory; all revision-sensitive behavior keys
//! off this one value. AC1009 (R12) is the legacy revision: no sub-record
//! markers and no handle-based object references.

use crate::error::{DxfError, Result};
use std::fmt;

/// Drawing interchange format revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DxfVersion {
    /// AutoCAD R12 (legacy, no sub-record markers)
    AC1009,
    /// AutoCAD 2000
    AC1015,
    /// AutoCAD 2004
    AC1018,
    /// AutoCAD 2007
    AC1021,
    /// AutoCAD 2010
    AC1024,
    /// AutoCAD 2013
    AC1027,
    /// AutoCAD 2018
    AC1032,
}

impl DxfVersion {
    /// True for the legacy (unmarked) revision
    pub fn is_legacy(&self) -> bool {
        matches!(self, DxfVersion::AC1009)
    }

    /// True for revisions that delimit sub-records with marker tags
    pub fn has_subclass_markers(&self) -> bool {
        !self.is_legacy()
    }

    /// Parse the `$ACADVER` spelling of a revision
    pub fn from_version_string(s: &str) -> Result<Self> {
        match s.trim() {
            "AC1009" => Ok(DxfVersion::AC1009),
            "AC1015" => Ok(DxfVersion::AC1015),
            "AC1018" => Ok(DxfVersion::AC1018),
            "AC1021" => Ok(DxfVersion::AC1021),
            "AC1024" => Ok(DxfVersion::AC1024),
            "AC1027" => Ok(DxfVersion::AC1027),
            "AC1032" => Ok(DxfVersion::AC1032),
            other => Err(DxfError::UnsupportedVersion(other.to_string())),
        }
    }

    /// The `$ACADVER` spelling of this revision
    pub fn as_str(&self) -> &'static str {
        match self {
            DxfVersion::AC1009 => "AC1009",
            DxfVersion::AC1015 => "AC1015",
            DxfVersion::AC1018 => "AC1018",
            DxfVersion::AC1021 => "AC1021",
            DxfVersion::AC1024 => "AC1024",
            DxfVersion::AC1027 => "AC1027",
            DxfVersion::AC1032 => "AC1032",
        }
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
