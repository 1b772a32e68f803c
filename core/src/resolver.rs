//! Finds the struct hidden behind a type.
//!
//! Named types are replaced by their underlying type and pointers by their
//! element until a struct or some other terminal shape is reached.

use tagscope_common::model::{Package, StructType, Type, TypeId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("type {original:?} is not a struct")]
    NotAStruct { original: TypeId },
}

/// Unwraps `ty` to the struct it denotes.
///
/// Returns the struct together with its arena id, which identifies it during
/// nested traversal.
pub fn resolve_struct(pkg: &Package, ty: TypeId) -> Result<(TypeId, &StructType), ResolveError> {
    let original = ty;
    let mut current = ty;
    // Well-formed models terminate on their own; this only stops `type P *P`.
    let mut seen: Vec<TypeId> = Vec::new();

    loop {
        match pkg.ty(current) {
            Type::Struct(st) => return Ok((current, st)),
            Type::Named { underlying, .. } => {
                seen.push(current);
                current = *underlying;
            }
            Type::Pointer(elem) => {
                seen.push(current);
                current = *elem;
            }
            Type::Other(_) => return Err(ResolveError::NotAStruct { original }),
        }

        if seen.contains(&current) {
            return Err(ResolveError::NotAStruct { original });
        }
    }
}

pub fn is_struct(pkg: &Package, ty: TypeId) -> bool {
    resolve_struct(pkg, ty).is_ok()
}
