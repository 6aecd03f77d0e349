//! Tag stream primitives
//!
//! Everything in a drawing interchange file is a sequence of (group code,
//! value) pairs. This module defines the typed tag representation, the
//! group-code value ranges, the lazy stream parser and the sub-record
//! grouper that partitions one entity's tags into named records.

mod code;
mod parser;
mod subrecord;
mod tag;

pub use code::{is_point_base_code, value_type_for_code, GroupValueType};
pub use parser::{parse_tags, TagParser};
pub use subrecord::{group_tags, EntityTags, SubRecord, SUBCLASS_MARKER};
pub use tag::{Tag, TagValue};
