//! Loader / exporter
//!
//! Bidirectional mapping between an attribute namespace and a tag
//! sequence, driven by an entity schema and the target revision. Tags
//! consumed by no descriptor are accumulated as residue and never
//! discarded; that is what keeps documents with tags from newer revisions
//! lossless through a round-trip.

use crate::error::{DxfError, Result};
use crate::schema::{AttrDef, AttrKind, AttrValue, EntitySchema, Namespace, ValueSource};
use crate::tags::{EntityTags, SubRecord, Tag, TagValue, SUBCLASS_MARKER};
use crate::types::{DxfVersion, Handle};

/// Tags present in source data but consumed by no descriptor.
///
/// Retained per sub-record with the marker label preserved, for
/// diagnostics and for re-emission on export.
#[derive(Debug, Clone, Default)]
pub struct Residue {
    /// Leftover tags grouped like the source records
    pub records: Vec<SubRecord>,
}

impl Residue {
    /// True if no tags were left over
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of leftover tags
    pub fn tag_count(&self) -> usize {
        self.records.iter().map(|r| r.tags.len()).sum()
    }

    fn record_tags<'a>(&'a self, name: Option<&'a str>) -> impl Iterator<Item = &'a Tag> + 'a {
        self.records
            .iter()
            .filter(move |r| r.name.as_deref() == name)
            .flat_map(|r| r.tags.iter())
    }
}

/// Populate a namespace from grouped entity tags.
///
/// For each descriptor applicable to `version`, the matching sub-record is
/// searched in encounter order and the first matching group code wins; an
/// entity malformed with duplicate codes silently keeps the first, the
/// rest stay in the residue. Absent attributes get their defaults, flagged
/// as not present in source. Wrong composite arity fails with
/// [`DxfError::InvalidAttributeShape`].
pub fn load(
    entity: &EntityTags,
    schema: &'static EntitySchema,
    version: DxfVersion,
) -> Result<(Namespace, Residue)> {
    let mut ns = Namespace::with_defaults(schema, version);
    let mut consumed: Vec<Vec<bool>> = entity
        .sub_records
        .iter()
        .map(|r| vec![false; r.tags.len()])
        .collect();

    for record_schema in &schema.records {
        // Under the legacy revision every descriptor resolves against the
        // single base record; this is the central revision branch.
        let target = if version.is_legacy() {
            Some(0)
        } else {
            match record_schema.marker {
                None => Some(0),
                Some(marker) => entity
                    .sub_records
                    .iter()
                    .position(|r| r.name.as_deref() == Some(marker)),
            }
        };

        for def in &record_schema.attrs {
            if !def.applies_to(version) {
                continue;
            }
            let record_index = match target {
                Some(i) => i,
                // Record absent from source: defaults stay in place
                None => continue,
            };
            let record = &entity.sub_records[record_index];
            let found = record
                .tags
                .iter()
                .enumerate()
                .find(|(i, tag)| !consumed[record_index][*i] && tag.code == def.code);
            if let Some((tag_index, tag)) = found {
                consumed[record_index][tag_index] = true;
                let value = coerce_tag_value(def, tag)?;
                ns.insert_loaded(def.name, value);
            }
        }
    }

    let mut residue = Residue::default();
    for (record_index, record) in entity.sub_records.iter().enumerate() {
        let leftover: Vec<Tag> = record
            .tags
            .iter()
            .enumerate()
            .filter(|(i, _)| !consumed[record_index][*i])
            .map(|(_, tag)| tag.clone())
            .collect();
        if !leftover.is_empty() {
            residue.records.push(SubRecord {
                name: record.name.clone(),
                tags: leftover,
            });
        }
    }

    Ok((ns, residue))
}

fn coerce_tag_value(def: &AttrDef, tag: &Tag) -> Result<AttrValue> {
    let shape_error = || DxfError::InvalidAttributeShape {
        attribute: def.name,
        expected: def.kind.name(),
        actual: tag.value.type_name(),
    };
    match (def.kind, &tag.value) {
        (AttrKind::Text, TagValue::Text(s)) => Ok(AttrValue::Text(s.clone())),
        (AttrKind::Integer, TagValue::Integer(v)) => Ok(AttrValue::Integer(*v)),
        (AttrKind::Double, TagValue::Double(v)) => Ok(AttrValue::Double(*v)),
        // Integer tags are accepted where a double is expected
        (AttrKind::Double, TagValue::Integer(v)) => Ok(AttrValue::Double(*v as f64)),
        (AttrKind::Handle, TagValue::Text(s)) => Handle::from_hex(s).map(AttrValue::Handle),
        (AttrKind::Point3, TagValue::Point3(v)) => Ok(AttrValue::Point3(*v)),
        (AttrKind::Point2, TagValue::Point2(v)) => Ok(AttrValue::Point2(*v)),
        _ => Err(shape_error()),
    }
}

fn value_to_tag(code: i32, value: &AttrValue) -> Tag {
    match value {
        AttrValue::Text(s) => Tag::text(code, s.clone()),
        AttrValue::Integer(v) => Tag::integer(code, *v),
        AttrValue::Double(v) => Tag::double(code, *v),
        AttrValue::Handle(h) => Tag::text(code, h.to_hex()),
        AttrValue::Point2(p) => Tag::point2(code, *p),
        AttrValue::Point3(p) => Tag::point3(code, *p),
    }
}

/// Export the namespace per sub-record, without flattening.
///
/// Each element is (marker name, tags). An attribute is emitted only if
/// it is required, present in source, or has been mutated since load;
/// untouched defaults are suppressed to keep output minimal and stable
/// under round-trips. Residue tags are re-emitted with their records.
pub fn export_records(
    ns: &Namespace,
    residue: &Residue,
    schema: &EntitySchema,
    version: DxfVersion,
) -> Vec<(Option<String>, Vec<Tag>)> {
    if version.is_legacy() {
        let mut tags = Vec::new();
        for record_schema in &schema.records {
            emit_attrs(ns, record_schema.attrs.iter(), version, &mut tags);
        }
        for record in &residue.records {
            tags.extend(record.tags.iter().cloned());
        }
        return vec![(None, tags)];
    }

    let mut records: Vec<(Option<String>, Vec<Tag>)> = Vec::new();
    for record_schema in &schema.records {
        let mut tags = Vec::new();
        emit_attrs(ns, record_schema.attrs.iter(), version, &mut tags);
        tags.extend(residue.record_tags(record_schema.marker).cloned());
        records.push((record_schema.marker.map(str::to_string), tags));
    }
    // Residue records with markers unknown to the schema keep their own
    // records at the end.
    for record in &residue.records {
        let known = record.name.is_none()
            || schema
                .records
                .iter()
                .any(|r| r.marker == record.name.as_deref());
        if !known {
            records.push((record.name.clone(), record.tags.clone()));
        }
    }
    records
}

fn emit_attrs<'a>(
    ns: &Namespace,
    attrs: impl Iterator<Item = &'a AttrDef>,
    version: DxfVersion,
    out: &mut Vec<Tag>,
) {
    for def in attrs {
        if !def.applies_to(version) {
            continue;
        }
        match ns.slot(def.name) {
            Some(slot) => {
                if !def.optional || slot.source != ValueSource::Default {
                    out.push(value_to_tag(def.code, &slot.value));
                }
            }
            // Slot missing (namespace built for another revision): required
            // attributes still emit their default.
            None if !def.optional => out.push(value_to_tag(def.code, &def.default)),
            None => {}
        }
    }
}

/// Flatten per-record tags into one sequence, inserting marker tags for
/// revisions that support them
pub fn flatten_records(
    records: Vec<(Option<String>, Vec<Tag>)>,
    version: DxfVersion,
) -> Vec<Tag> {
    let mut out = Vec::new();
    for (name, tags) in records {
        if let Some(name) = name {
            if version.has_subclass_markers() {
                out.push(Tag::text(SUBCLASS_MARKER, name));
            }
        }
        out.extend(tags);
    }
    out
}

/// Export a namespace (plus residue) straight to a flat tag sequence
pub fn export(
    ns: &Namespace,
    residue: &Residue,
    schema: &EntitySchema,
    version: DxfVersion,
) -> Vec<Tag> {
    flatten_records(export_records(ns, residue, schema, version), version)
}
