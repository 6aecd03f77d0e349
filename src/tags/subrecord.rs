//! Sub-record grouper
//!
//! Partitions one entity's flat tag sequence (already isolated at entity
//! boundaries by the caller) into an ordered list of sub-records, and
//! isolates the handle, owner and extended-data tags. Modern revisions
//! delimit sub-records with marker tags (code 100); the legacy revision
//! has no markers and the whole sequence forms the single base record.

use crate::error::{DxfError, Result};
use crate::tags::tag::Tag;
use crate::types::{DxfVersion, Handle};

/// Group code that opens a named sub-record in modern revisions
pub const SUBCLASS_MARKER: i32 = 100;

/// Group code carrying the entity handle
const HANDLE_CODE: i32 = 5;

/// Group code carrying the owner handle
const OWNER_CODE: i32 = 330;

/// First extended-data group code
const XDATA_START: i32 = 1000;

/// A contiguous, optionally marker-named run of tags within one entity
#[derive(Debug, Clone, PartialEq)]
pub struct SubRecord {
    /// Marker name; `None` for the implicit base record
    pub name: Option<String>,
    /// Tags belonging to this record, in encounter order
    pub tags: Vec<Tag>,
}

impl SubRecord {
    /// Create an empty record
    pub fn new(name: Option<String>) -> Self {
        SubRecord {
            name,
            tags: Vec::new(),
        }
    }

    /// True for the implicit base record
    pub fn is_base(&self) -> bool {
        self.name.is_none()
    }
}

/// One entity's tags, grouped and with bookkeeping tags isolated
#[derive(Debug, Clone)]
pub struct EntityTags {
    /// Entity type name from the leading code-0 tag
    pub dxftype: String,
    /// Entity handle (code 5), absent in legacy data
    pub handle: Option<Handle>,
    /// Owner handle (code 330), absent in legacy data
    pub owner: Option<Handle>,
    /// Ordered sub-records; the first is always the base record
    pub sub_records: Vec<SubRecord>,
    /// Extended-data tags (codes >= 1000), retained verbatim
    pub xdata: Vec<Tag>,
}

impl EntityTags {
    /// Find a sub-record by marker name
    pub fn record(&self, name: &str) -> Option<&SubRecord> {
        self.sub_records
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
    }

    /// The implicit base record
    pub fn base(&self) -> &SubRecord {
        // group_tags always produces the base record first
        &self.sub_records[0]
    }
}

/// Group one entity's tag sequence into sub-records.
///
/// The first tag must be the code-0 type tag. A marker tag opens a new
/// named record and terminates the previous one; a repeated marker name
/// merges into its first occurrence, so there is at most one record per
/// marker. Under the legacy revision markers are not recognized and all
/// tags land in the base record.
pub fn group_tags(tags: Vec<Tag>, version: DxfVersion) -> Result<EntityTags> {
    let mut iter = tags.into_iter();

    let dxftype = match iter.next() {
        Some(tag) if tag.code == 0 => tag
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| DxfError::Parse("type tag must carry a text value".to_string()))?,
        _ => {
            return Err(DxfError::Parse(
                "entity tags must start with a code 0 type tag".to_string(),
            ))
        }
    };

    let mut entity = EntityTags {
        dxftype,
        handle: None,
        owner: None,
        sub_records: vec![SubRecord::new(None)],
        xdata: Vec::new(),
    };
    let mut current: usize = 0;

    for tag in iter {
        if tag.code == HANDLE_CODE && entity.handle.is_none() {
            entity.handle = Some(parse_handle(&tag)?);
            continue;
        }
        if tag.code == OWNER_CODE && entity.owner.is_none() {
            entity.owner = Some(parse_handle(&tag)?);
            continue;
        }
        if tag.code >= XDATA_START {
            entity.xdata.push(tag);
            continue;
        }
        if tag.code == SUBCLASS_MARKER && version.has_subclass_markers() {
            let name = tag
                .as_text()
                .map(str::to_string)
                .ok_or_else(|| DxfError::Parse("marker tag must carry a text value".to_string()))?;
            current = match entity
                .sub_records
                .iter()
                .position(|r| r.name.as_deref() == Some(name.as_str()))
            {
                Some(existing) => existing,
                None => {
                    entity.sub_records.push(SubRecord::new(Some(name)));
                    entity.sub_records.len() - 1
                }
            };
            continue;
        }
        entity.sub_records[current].tags.push(tag);
    }

    Ok(entity)
}

fn parse_handle(tag: &Tag) -> Result<Handle> {
    let text = tag
        .as_text()
        .ok_or_else(|| DxfError::Parse(format!("handle tag {} must carry text", tag.code)))?;
    Handle::from_hex(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::parser::parse_tags;
    use crate::types::Vector3;

    fn point_tags() -> Vec<Tag> {
        parse_tags(concat!(
            "0\nPOINT\n",
            "5\n2E2\n",
            "330\n1F\n",
            "100\nAcDbEntity\n",
            "8\nWalls\n",
            "100\nAcDbPoint\n",
            "10\n1.0\n20\n2.0\n30\n3.0\n",
            "1001\nACAD\n",
            "1000\nextension\n",
        ))
        .unwrap()
    }

    #[test]
    fn test_modern_grouping() {
        let entity = group_tags(point_tags(), DxfVersion::AC1015).unwrap();
        assert_eq!(entity.dxftype, "POINT");
        assert_eq!(entity.handle, Some(Handle::new(0x2E2)));
        assert_eq!(entity.owner, Some(Handle::new(0x1F)));
        assert_eq!(entity.sub_records.len(), 3);
        assert!(entity.base().tags.is_empty());
        assert_eq!(
            entity.record("AcDbEntity").unwrap().tags,
            vec![Tag::text(8, "Walls")]
        );
        assert_eq!(
            entity.record("AcDbPoint").unwrap().tags,
            vec![Tag::point3(10, Vector3::new(1.0, 2.0, 3.0))]
        );
        assert_eq!(entity.xdata.len(), 2);
    }

    #[test]
    fn test_legacy_single_base_record() {
        let tags = parse_tags(concat!(
            "0\nPOINT\n",
            "8\nWalls\n",
            "10\n1.0\n20\n2.0\n30\n3.0\n",
        ))
        .unwrap();
        let entity = group_tags(tags, DxfVersion::AC1009).unwrap();
        assert_eq!(entity.sub_records.len(), 1);
        assert_eq!(entity.base().tags.len(), 2);
        assert_eq!(entity.handle, None);
    }

    #[test]
    fn test_duplicate_marker_merges() {
        let tags = parse_tags(concat!(
            "0\nPOINT\n",
            "100\nAcDbEntity\n",
            "8\nWalls\n",
            "100\nAcDbEntity\n",
            "62\n3\n",
        ))
        .unwrap();
        let entity = group_tags(tags, DxfVersion::AC1015).unwrap();
        assert_eq!(entity.sub_records.len(), 2);
        let record = entity.record("AcDbEntity").unwrap();
        assert_eq!(record.tags, vec![Tag::text(8, "Walls"), Tag::integer(62, 3)]);
    }

    #[test]
    fn test_missing_type_tag() {
        let tags = parse_tags("8\nWalls\n").unwrap();
        assert!(group_tags(tags, DxfVersion::AC1015).is_err());
    }
}
