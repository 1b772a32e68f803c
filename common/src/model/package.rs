use std::collections::HashMap;
use std::fmt;

use crate::model::types::{Type, TypeArena, TypeId};

/// `package-path + "." + name`, the way Go spells a package member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub package_path: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(package_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package_path: package_path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package_path.is_empty() {
            return f.write_str(&self.name);
        }
        write!(f, "{}.{}", self.package_path, self.name)
    }
}

/// A named top-level entity of the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub ty: TypeId,
}

#[derive(Debug, Clone)]
pub struct Package {
    path: String,
    name: String,
    declarations: HashMap<String, Declaration>,
    types: TypeArena,
}

impl Package {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            declarations: HashMap::new(),
            types: TypeArena::new(),
        }
    }

    /// Import path, e.g. `example.com/project/models`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Name from the package clause.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &TypeArena {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeArena {
        &mut self.types
    }

    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id]
    }

    /// Adds a declaration, returning the one it replaced if the name was taken.
    pub fn declare(&mut self, name: impl Into<String>, ty: TypeId) -> Option<Declaration> {
        let name: String = name.into();
        self.declarations
            .insert(name.clone(), Declaration { name, ty })
    }

    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    /// All declarations, in no particular order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn qualified_name(&self, decl: &Declaration) -> QualifiedName {
        QualifiedName::new(self.path.clone(), decl.name.clone())
    }
}
