//! # tagcad
//!
//! A pure Rust library for reading, representing, transforming and
//! re-exporting drawing-interchange tag data (DXF format).
//!
//! Every entity in the format is an ordered sequence of (group code,
//! value) pairs, grouped into named sub-records, with encoding rules that
//! differ across format revisions. This crate implements the marshalling
//! framework underneath every entity type:
//!
//! - Typed tags and the lazy tag stream parser
//! - The sub-record grouper, including the unmarked legacy layout
//! - The declarative attribute schema system with per-revision layering
//! - The bidirectional loader/exporter with lossless residue handling
//! - The entity registry/factory with pre-load fixup hooks
//! - The geometric-transform contract shared by spatial entities
//! - The MESH geometry payload with its scoped edit/optimize session
//!
//! ## Quick Start
//!
//! ```rust
//! use tagcad::factory::EntityFactory;
//! use tagcad::tags::parse_tags;
//! use tagcad::types::DxfVersion;
//!
//! let tags = parse_tags("0\nPOINT\n100\nAcDbEntity\n8\n0\n100\nAcDbPoint\n10\n1.0\n20\n2.0\n30\n3.0\n")?;
//! let mut factory = EntityFactory::new(DxfVersion::AC1032);
//! let entity = factory.construct(tags)?;
//! assert_eq!(entity.dxftype(), "POINT");
//! # Ok::<(), tagcad::error::DxfError>(())
//! ```

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod entities;
pub mod error;
pub mod factory;
pub mod notification;
pub mod schema;
pub mod tags;
pub mod types;

// Re-export commonly used types
pub use error::{DxfError, Result};
pub use types::{DxfVersion, Handle, Matrix4, Transform, Vector2, Vector3};

pub use entities::{Entity, EntityData, MeshData, MeshEditor, TransformEntity};
pub use factory::{EntityFactory, Registry};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use schema::{AttrDef, AttrKind, AttrValue, EntitySchema, Namespace, Residue};
pub use tags::{group_tags, parse_tags, EntityTags, SubRecord, Tag, TagParser, TagValue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_factory_creation() {
        let factory = EntityFactory::new(DxfVersion::AC1032);
        assert_eq!(factory.version(), DxfVersion::AC1032);

        let legacy = EntityFactory::new(DxfVersion::AC1009);
        assert!(legacy.registry().get("MESH").is_none());
    }
}
