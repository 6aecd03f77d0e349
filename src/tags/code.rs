//! Group code value ranges
//!
//! The value type of a tag is a pure function of its group code. The
//! ranges below follow the DXF reference; codes outside every defined
//! range are treated as text so that data from future revisions survives
//! a round-trip.

/// Value type mandated by a group code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupValueType {
    /// String value
    Text,
    /// Signed integer value (16/32/64-bit ranges are not distinguished here)
    Integer,
    /// Double-precision floating point value
    Double,
    /// X component of a composite point/vector (y = code + 10, z = code + 20)
    PointBase,
}

impl GroupValueType {
    /// Human-readable name, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            GroupValueType::Text => "text",
            GroupValueType::Integer => "integer",
            GroupValueType::Double => "double",
            GroupValueType::PointBase => "double",
        }
    }
}

/// True if `code` starts a composite point/vector group
pub fn is_point_base_code(code: i32) -> bool {
    matches!(code, 10..=18 | 110..=112 | 210 | 1010..=1013)
}

/// Determine the value type for a group code
pub fn value_type_for_code(code: i32) -> GroupValueType {
    if is_point_base_code(code) {
        return GroupValueType::PointBase;
    }
    match code {
        0..=9 => GroupValueType::Text,
        // 19..=59 covers orphaned y/z components (20-38), elevation,
        // thickness and the plain real range 40-59
        19..=59 => GroupValueType::Double,
        60..=79 => GroupValueType::Integer,
        90..=99 => GroupValueType::Integer,
        // Sub-record markers and control strings
        100..=102 => GroupValueType::Text,
        // DIMSTYLE handle exception
        105 => GroupValueType::Text,
        113..=149 => GroupValueType::Double,
        160..=179 => GroupValueType::Integer,
        211..=239 => GroupValueType::Double,
        270..=289 => GroupValueType::Integer,
        // Boolean range, carried as integers
        290..=299 => GroupValueType::Integer,
        300..=309 => GroupValueType::Text,
        // Binary chunks travel as hex text
        310..=319 => GroupValueType::Text,
        // Arbitrary / pointer / owner handles
        320..=369 => GroupValueType::Text,
        370..=389 => GroupValueType::Integer,
        390..=399 => GroupValueType::Text,
        400..=409 => GroupValueType::Integer,
        410..=419 => GroupValueType::Text,
        420..=429 => GroupValueType::Integer,
        430..=439 => GroupValueType::Text,
        440..=459 => GroupValueType::Integer,
        460..=469 => GroupValueType::Double,
        470..=479 => GroupValueType::Text,
        480..=481 => GroupValueType::Text,
        // Comment
        999 => GroupValueType::Text,
        1000..=1009 => GroupValueType::Text,
        1014..=1059 => GroupValueType::Double,
        1060..=1071 => GroupValueType::Integer,
        _ => GroupValueType::Text,
    }
}
