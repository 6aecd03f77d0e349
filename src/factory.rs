//! Entity registry and factory
//!
//! The registry maps a type name to a constructible entity variant. It is
//! built once per factory and read-only afterwards; there is no ambient or
//! global registration. The modern registry is layered on top of the
//! legacy one rather than duplicated, so revision-specific behavior lives
//! in one table update, not in divergent code paths. Fixup hooks repair
//! known historical encoding quirks for a type name before loading.

use crate::entities::{line, mesh, point, Entity, EntityData, UNKNOWN_SCHEMA};
use crate::error::{DxfError, Result};
use crate::notification::{NotificationCollection, NotificationType};
use crate::schema::{self, EntitySchema, Namespace, Residue};
use crate::tags::{group_tags, Tag, SUBCLASS_MARKER};
use crate::types::DxfVersion;
use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Pre-load tag repair function
pub type FixupFn = fn(&mut Vec<Tag>);

/// Variant builder: turns a loaded namespace plus residue into the
/// type-specific payload, consuming structured residue where needed
pub type BuildFn = fn(&mut Namespace, &mut Residue) -> Result<EntityData>;

/// A constructible entity variant: its schema and payload builder
#[derive(Debug, Clone, Copy)]
pub struct EntityConstructor {
    /// Canonical type name
    pub dxftype: &'static str,
    /// Full entity schema
    pub schema: &'static EntitySchema,
    /// Payload builder
    pub build: BuildFn,
}

/// Immutable-after-init mapping from type name to entity constructor,
/// plus the fixup-hook table
#[derive(Debug, Clone)]
pub struct Registry {
    wrappers: IndexMap<&'static str, EntityConstructor>,
    fixups: IndexMap<&'static str, FixupFn>,
}

impl Registry {
    /// Base registry for the legacy revision
    pub fn legacy() -> Self {
        let mut wrappers = IndexMap::new();
        wrappers.insert(
            "POINT",
            EntityConstructor {
                dxftype: "POINT",
                schema: point::schema(),
                build: point::build,
            },
        );
        wrappers.insert(
            "LINE",
            EntityConstructor {
                dxftype: "LINE",
                schema: line::schema(),
                build: line::build,
            },
        );
        Registry {
            wrappers,
            fixups: IndexMap::new(),
        }
    }

    /// Modern registry: the legacy table with richer variants layered on
    /// top. MESH only exists here, and its fixup hook with it.
    pub fn modern() -> Self {
        let mut registry = Self::legacy();
        registry.wrappers.insert(
            "MESH",
            EntityConstructor {
                dxftype: "MESH",
                schema: mesh::schema(),
                build: mesh::build,
            },
        );
        registry.fixups.insert("MESH", fix_mesh_tags);
        registry
    }

    /// Look up a constructor by type name
    pub fn get(&self, dxftype: &str) -> Option<&EntityConstructor> {
        self.wrappers.get(dxftype)
    }

    /// Look up a fixup hook by type name
    pub fn fixup(&self, dxftype: &str) -> Option<FixupFn> {
        self.fixups.get(dxftype).copied()
    }

    /// Registered type names, in registration order
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.wrappers.keys().copied()
    }
}

/// Entity factory for one document session.
///
/// Resolves type names against the revision-appropriate registry,
/// applies fixups, groups tags and loads entities. Residue tags and
/// unresolved type names are collected as notifications, never errors.
#[derive(Debug)]
pub struct EntityFactory {
    version: DxfVersion,
    registry: Registry,
    notifications: NotificationCollection,
}

impl EntityFactory {
    /// Create a factory for the given revision
    pub fn new(version: DxfVersion) -> Self {
        let registry = if version.is_legacy() {
            Registry::legacy()
        } else {
            Registry::modern()
        };
        EntityFactory {
            version,
            registry,
            notifications: NotificationCollection::new(),
        }
    }

    /// Create a factory with a caller-supplied registry
    pub fn with_registry(version: DxfVersion, registry: Registry) -> Self {
        EntityFactory {
            version,
            registry,
            notifications: NotificationCollection::new(),
        }
    }

    /// The factory's revision
    pub fn version(&self) -> DxfVersion {
        self.version
    }

    /// The factory's registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Notifications collected so far
    pub fn notifications(&self) -> &NotificationCollection {
        &self.notifications
    }

    /// Resolve a type name to its constructor.
    ///
    /// Fails with [`DxfError::UnknownEntityType`]; this is recoverable,
    /// the caller may keep the entity as an opaque residue record via
    /// [`EntityFactory::construct_or_unknown`].
    pub fn resolve(&self, dxftype: &str) -> Result<&EntityConstructor> {
        self.registry
            .get(dxftype)
            .ok_or_else(|| DxfError::UnknownEntityType(dxftype.to_string()))
    }

    /// Construct an entity from one entity's raw tag sequence:
    /// fixup, group into sub-records, load through the schema, build the
    /// variant payload.
    pub fn construct(&mut self, mut raw_tags: Vec<Tag>) -> Result<Entity> {
        let dxftype = leading_type_name(&raw_tags)?;
        let constructor = *self.resolve(&dxftype)?;

        if let Some(fixup) = self.registry.fixup(&dxftype) {
            let before = raw_tags.clone();
            fixup(&mut raw_tags);
            if raw_tags != before {
                self.notifications.notify(
                    NotificationType::TagsRepaired,
                    format!("repaired tags of {}", dxftype),
                );
            }
        }

        let grouped = group_tags(raw_tags, self.version)?;
        let (mut namespace, mut residue) =
            schema::load(&grouped, constructor.schema, self.version)?;
        let data = (constructor.build)(&mut namespace, &mut residue)?;

        if !residue.is_empty() {
            self.notifications.notify(
                NotificationType::UnprocessedTags,
                format!(
                    "{} unprocessed tag(s) in {} entity",
                    residue.tag_count(),
                    dxftype
                ),
            );
        }

        Ok(Entity {
            dxftype: grouped.dxftype,
            handle: grouped.handle,
            owner: grouped.owner,
            namespace,
            residue,
            xdata: grouped.xdata,
            data,
        })
    }

    /// Like [`EntityFactory::construct`], but an unresolved type name is
    /// kept as an opaque residue entity instead of failing, so a document
    /// with unknown extensions still loads completely.
    pub fn construct_or_unknown(&mut self, raw_tags: Vec<Tag>) -> Result<Entity> {
        let dxftype = leading_type_name(&raw_tags)?;
        if self.registry.get(&dxftype).is_some() {
            return self.construct(raw_tags);
        }

        self.notifications.notify(
            NotificationType::UnknownEntity,
            format!("unresolved entity type {}, kept as residue", dxftype),
        );
        let grouped = group_tags(raw_tags, self.version)?;
        let (namespace, residue) =
            schema::load(&grouped, Lazy::force(&UNKNOWN_SCHEMA), self.version)?;
        Ok(Entity {
            dxftype: grouped.dxftype,
            handle: grouped.handle,
            owner: grouped.owner,
            namespace,
            residue,
            xdata: grouped.xdata,
            data: EntityData::Unknown,
        })
    }
}

fn leading_type_name(tags: &[Tag]) -> Result<String> {
    match tags.first() {
        Some(tag) if tag.code == 0 => tag
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| DxfError::Parse("type tag must carry a text value".to_string())),
        _ => Err(DxfError::Parse(
            "entity tags must start with a code 0 type tag".to_string(),
        )),
    }
}

/// Some exporters leave MESH geometry in the entity record without the
/// `AcDbSubDMesh` marker; re-insert the marker ahead of the first
/// mesh-specific tag so the grouper files the geometry correctly.
fn fix_mesh_tags(tags: &mut Vec<Tag>) {
    let has_marker = tags.iter().any(|t| {
        t.code == SUBCLASS_MARKER && t.as_text() == Some(mesh::ACDB_SUBD_MESH)
    });
    if has_marker {
        return;
    }
    let first_mesh_tag = tags
        .iter()
        .position(|t| matches!(t.code, 71 | 72 | 91 | 92));
    if let Some(index) = first_mesh_tag {
        tags.insert(index, Tag::text(SUBCLASS_MARKER, mesh::ACDB_SUBD_MESH));
    }
}
