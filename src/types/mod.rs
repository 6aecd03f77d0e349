//! Core value types shared across the library

pub mod handle;
pub mod transform;
pub mod vector;
pub mod version;

pub use handle::Handle;
pub use transform::{Matrix4, Transform};
pub use vector::{Vector2, Vector3};
pub use version::DxfVersion;
