//! # Package Model
//!
//! Read-only view of one compiled package: its top-level declarations and the
//! arena of types they refer to. The loader builds it once, the analyses only
//! read it.

pub mod package;
pub mod tag;
pub mod types;

pub use package::{Declaration, Package, QualifiedName};
pub use tag::StructTag;
pub use types::{Field, StructType, Type, TypeArena, TypeId};
