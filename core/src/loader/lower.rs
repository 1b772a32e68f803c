//! Turns parsed declarations into the package model.

use std::collections::{HashMap, HashSet};

use tagscope_common::model::{Field, Package, QualifiedName, StructType, Type, TypeId};
use tracing::{debug, warn};

use super::parser::{SourceFile, TypeDecl, TypeExpr};

const PREDECLARED: &[&str] = &[
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32",
    "float64", "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr",
];

/// Builds the package from every file's type declarations.
///
/// Each declared name first gets an arena slot so declarations may refer to
/// each other, and to themselves, in any order.
pub fn build_package(path: String, name: String, files: &[SourceFile]) -> Package {
    let mut pkg = Package::new(path, name);
    let mut declared: HashMap<&str, TypeId> = HashMap::new();
    let mut decls: Vec<(&TypeDecl, TypeId)> = Vec::new();

    for decl in files.iter().flat_map(|file| file.types.iter()) {
        if decl.name == "_" {
            continue;
        }
        if declared.contains_key(decl.name.as_str()) {
            warn!("{} redeclared on line {}, keeping the first", decl.name, decl.line);
            continue;
        }
        let id = pkg.types_mut().reserve();
        declared.insert(decl.name.as_str(), id);
        decls.push((decl, id));
    }

    for (decl, id) in decls {
        let mut lowering = Lowering {
            pkg: &mut pkg,
            declared: &declared,
            params: decl.params.iter().map(String::as_str).collect(),
        };
        let underlying = lowering.lower(&decl.ty);

        let qualified = QualifiedName::new(pkg.path().to_string(), decl.name.clone());
        pkg.types_mut().define(
            id,
            Type::Named {
                name: qualified,
                underlying,
            },
        );
        pkg.declare(decl.name.clone(), id);
        debug!("declared {} as {}", decl.name, pkg.types().describe(underlying));
    }

    pkg
}

struct Lowering<'a, 'd> {
    pkg: &'a mut Package,
    declared: &'a HashMap<&'d str, TypeId>,
    /// Generic parameters of the declaration being lowered.
    params: HashSet<&'a str>,
}

impl Lowering<'_, '_> {
    fn lower(&mut self, expr: &TypeExpr) -> TypeId {
        match expr {
            TypeExpr::Name {
                package: Some(package),
                name,
            } => {
                // Members of other packages are never followed.
                self.other(format!("{package}.{name}"))
            }
            TypeExpr::Name {
                package: None,
                name,
            } => self.local(name),
            TypeExpr::Pointer(elem) => {
                let elem = self.lower(elem);
                self.pkg.types_mut().alloc(Type::Pointer(elem))
            }
            TypeExpr::Struct(fields) => {
                let fields: Vec<Field> = fields
                    .iter()
                    .map(|field| Field {
                        name: field.name.clone(),
                        ty: self.lower(&field.ty),
                        tag: field.tag.clone().unwrap_or_default(),
                        embedded: field.embedded,
                    })
                    .collect();
                self.pkg.types_mut().alloc(Type::Struct(StructType::new(fields)))
            }
            TypeExpr::Opaque(text) => self.other(text.clone()),
        }
    }

    fn local(&mut self, name: &str) -> TypeId {
        if self.params.contains(name) || PREDECLARED.contains(&name) {
            return self.other(name.to_string());
        }
        if let Some(id) = self.declared.get(name) {
            return *id;
        }
        warn!("undeclared type {name}, treating it as opaque");
        self.other(name.to_string())
    }

    fn other(&mut self, spelling: String) -> TypeId {
        self.pkg.types_mut().alloc(Type::Other(spelling))
    }
}
