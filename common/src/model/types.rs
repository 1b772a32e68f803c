use std::ops::Index;

use la_arena::{Arena, Idx};

use crate::model::package::QualifiedName;

/// Index of a [`Type`] inside its [`TypeArena`].
///
/// Also serves as the identity of a type: two fields sharing a struct point at
/// the same id.
pub type TypeId = Idx<Type>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A declared type name and the type it stands for.
    Named {
        name: QualifiedName,
        underlying: TypeId,
    },
    Pointer(TypeId),
    Struct(StructType),
    /// Any terminal shape that is not a struct. Carries its source spelling.
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructType {
    pub fields: Vec<Field>,
}

impl StructType {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    /// Raw tag string with the literal quoting already removed.
    pub tag: String,
    pub embedded: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeId, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            tag: tag.into(),
            embedded: false,
        }
    }
}

/// Owns every [`Type`] of a package.
///
/// Types refer to each other through [`TypeId`], which lets recursive
/// declarations such as `type Node struct { Next *Node }` exist without
/// ownership cycles.
#[derive(Debug, Clone, Default)]
pub struct TypeArena {
    types: Arena<Type>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, ty: Type) -> TypeId {
        self.types.alloc(ty)
    }

    /// Allocates a slot to be filled later with [`TypeArena::define`].
    ///
    /// Until then the slot reads as an empty `Other`.
    pub fn reserve(&mut self) -> TypeId {
        self.types.alloc(Type::Other(String::new()))
    }

    pub fn define(&mut self, id: TypeId, ty: Type) {
        self.types[id] = ty;
    }

    /// Renders a type the way Go prints it, e.g. `*example.com/pkg.User`.
    pub fn describe(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id);
        out
    }

    fn write_type(&self, out: &mut String, id: TypeId) {
        match &self[id] {
            // Names stop the descent, so recursive declarations render finitely.
            Type::Named { name, .. } => out.push_str(&name.to_string()),
            Type::Pointer(elem) => {
                out.push('*');
                self.write_type(out, *elem);
            }
            Type::Struct(st) => {
                out.push_str("struct{");
                for (idx, field) in st.fields.iter().enumerate() {
                    if idx > 0 {
                        out.push_str("; ");
                    }
                    if !field.embedded {
                        out.push_str(&field.name);
                        out.push(' ');
                    }
                    self.write_type(out, field.ty);
                    if !field.tag.is_empty() {
                        out.push_str(&format!(" {:?}", field.tag));
                    }
                }
                out.push('}');
            }
            Type::Other(text) => out.push_str(text),
        }
    }
}

impl Index<TypeId> for TypeArena {
    type Output = Type;

    fn index(&self, id: TypeId) -> &Self::Output {
        &self.types[id]
    }
}
