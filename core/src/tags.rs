//! Collects tag values of a struct, descending into nested structs.
//!
//! Every field carrying the configured key contributes one line: the
//! backtick-quoted tag values from the target down to that field, joined with
//! `.`. Lines of a nested struct come before the line of the field holding it.

use tagscope_common::config::TagsConfig;
use tagscope_common::error::AnalysisError;
use tagscope_common::model::{Field, Package, StructTag, StructType, TypeId};
use tracing::{debug, trace};

use crate::resolver::{self, ResolveError};

/// Runs the extraction for `cfg.target` against `pkg`.
///
/// A target that lives in another package yields no lines rather than an
/// error, since the analysis stops at package boundaries.
pub fn extract_tags(pkg: &Package, cfg: &TagsConfig) -> Result<Vec<String>, AnalysisError> {
    let own_prefix = format!("{}.", pkg.path());
    let Some(name) = cfg.target.strip_prefix(own_prefix.as_str()) else {
        debug!("{} is outside package {}", cfg.target, pkg.path());
        return Ok(Vec::new());
    };
    if name.contains('/') {
        debug!("{} is outside package {}", cfg.target, pkg.path());
        return Ok(Vec::new());
    }

    let decl = pkg
        .declaration(name)
        .ok_or_else(|| AnalysisError::StructNotFound {
            name: name.to_string(),
            package: pkg.path().to_string(),
        })?;

    let (id, target) = resolver::resolve_struct(pkg, decl.ty).map_err(
        |ResolveError::NotAStruct { original }| AnalysisError::NotAStruct {
            ty: pkg.types().describe(original),
        },
    )?;

    let mut walker = TagWalker {
        pkg,
        cfg,
        expanding: vec![(id, cfg.target.clone())],
        lines: Vec::new(),
    };
    walker.walk(target, &[])?;

    debug!("{} tagged fields under {}", walker.lines.len(), cfg.target);
    Ok(walker.lines)
}

struct TagWalker<'a> {
    pkg: &'a Package,
    cfg: &'a TagsConfig,
    /// Structs currently being expanded, outermost first, with a label for errors.
    expanding: Vec<(TypeId, String)>,
    lines: Vec<String>,
}

impl<'a> TagWalker<'a> {
    fn walk(&mut self, st: &'a StructType, prefix: &[String]) -> Result<(), AnalysisError> {
        for field in &st.fields {
            let Some(value) = StructTag::new(&field.tag).lookup(&self.cfg.key) else {
                continue;
            };
            if value == self.cfg.ignore {
                trace!("skipping ignored field {}", field.name);
                continue;
            }

            // Each field gets its own copy so siblings never see each other's segments.
            let mut path: Vec<String> = prefix.to_vec();
            path.push(format!("`{value}`"));

            if let Ok((id, nested)) = resolver::resolve_struct(self.pkg, field.ty) {
                self.enter(id, field)?;
                self.walk(nested, &path)?;
                self.expanding.pop();
            }

            let line = path.join(".");
            trace!("{line}");
            self.lines.push(line);
        }
        Ok(())
    }

    fn enter(&mut self, id: TypeId, field: &Field) -> Result<(), AnalysisError> {
        if self.expanding.iter().any(|(seen, _)| *seen == id) {
            let mut path: Vec<String> = self
                .expanding
                .iter()
                .map(|(_, label)| label.clone())
                .collect();
            path.push(field.name.clone());
            return Err(AnalysisError::CyclicStructure { path });
        }
        self.expanding.push((id, field.name.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagscope_common::model::{QualifiedName, Type};

    const PKG: &str = "example.com/app/models";

    /// Declares a named struct; `fields` are `(name, type, tag)`.
    fn declare(pkg: &mut Package, name: &str, fields: Vec<(&str, TypeId, &str)>) -> TypeId {
        let named = pkg.types_mut().reserve();
        define(pkg, named, name, fields);
        named
    }

    fn define(pkg: &mut Package, named: TypeId, name: &str, fields: Vec<(&str, TypeId, &str)>) {
        let fields = fields
            .into_iter()
            .map(|(field, ty, tag)| Field::new(field, ty, tag))
            .collect();
        let body = pkg.types_mut().alloc(Type::Struct(StructType::new(fields)));
        pkg.types_mut().define(
            named,
            Type::Named {
                name: QualifiedName::new(PKG, name),
                underlying: body,
            },
        );
        pkg.declare(name, named);
    }

    fn other(pkg: &mut Package, spelling: &str) -> TypeId {
        pkg.types_mut().alloc(Type::Other(spelling.into()))
    }

    fn cfg(target: &str, key: &str) -> TagsConfig {
        TagsConfig::new(format!("{PKG}.{target}"), key, None).unwrap()
    }

    #[test]
    fn nested_lines_precede_the_enclosing_field() {
        let mut pkg = Package::new(PKG, "models");
        let string = other(&mut pkg, "string");
        let inner = declare(&mut pkg, "Inner", vec![("C", string, r#"k:"y""#)]);
        declare(
            &mut pkg,
            "Outer",
            vec![("A", inner, r#"k:"x""#), ("B", string, r#"k:"z""#)],
        );

        let lines = extract_tags(&pkg, &cfg("Outer", "k")).unwrap();
        assert_eq!(lines, vec!["`x`.`y`", "`x`", "`z`"]);
    }

    #[test]
    fn sibling_branches_do_not_share_prefixes() {
        let mut pkg = Package::new(PKG, "models");
        let int = other(&mut pkg, "int");
        let point = declare(
            &mut pkg,
            "Point",
            vec![("X", int, r#"json:"x""#), ("Y", int, r#"json:"y""#)],
        );
        let point_ptr = pkg.types_mut().alloc(Type::Pointer(point));
        declare(
            &mut pkg,
            "Segment",
            vec![("From", point, r#"json:"from""#), ("To", point_ptr, r#"json:"to""#)],
        );

        let lines = extract_tags(&pkg, &cfg("Segment", "json")).unwrap();
        assert_eq!(
            lines,
            vec![
                "`from`.`x`",
                "`from`.`y`",
                "`from`",
                "`to`.`x`",
                "`to`.`y`",
                "`to`",
            ]
        );
    }

    #[test]
    fn ignored_and_untagged_fields_contribute_nothing() {
        let mut pkg = Package::new(PKG, "models");
        let string = other(&mut pkg, "string");
        let secret = declare(&mut pkg, "Secret", vec![("Key", string, r#"json:"key""#)]);
        declare(
            &mut pkg,
            "User",
            vec![
                ("Name", string, r#"json:"name" db:"user_name""#),
                ("Password", secret, r#"json:"-""#),
                ("Internal", secret, ""),
                ("Email", string, r#"db:"email""#),
            ],
        );

        assert_eq!(extract_tags(&pkg, &cfg("User", "json")).unwrap(), vec!["`name`"]);
        assert_eq!(
            extract_tags(&pkg, &cfg("User", "db")).unwrap(),
            vec!["`user_name`", "`email`"]
        );
    }

    #[test]
    fn custom_ignore_value() {
        let mut pkg = Package::new(PKG, "models");
        let string = other(&mut pkg, "string");
        declare(
            &mut pkg,
            "Row",
            vec![("A", string, r#"col:"skip""#), ("B", string, r#"col:"-""#)],
        );
        let cfg = TagsConfig::new(format!("{PKG}.Row"), "col", Some("skip".into())).unwrap();

        assert_eq!(extract_tags(&pkg, &cfg).unwrap(), vec!["`-`"]);
    }

    #[test]
    fn malformed_tag_reads_as_absent_and_siblings_continue() {
        let mut pkg = Package::new(PKG, "models");
        let string = other(&mut pkg, "string");
        let inner = declare(&mut pkg, "Inner", vec![("C", string, r#"json:"c""#)]);
        declare(
            &mut pkg,
            "Mixed",
            vec![
                ("A", string, r#"json:"a""#),
                ("Unquoted", inner, "json:inner"),
                ("BadEscape", string, r#"json:"b\q""#),
                ("D", inner, r#"json:"d""#),
            ],
        );

        assert_eq!(
            extract_tags(&pkg, &cfg("Mixed", "json")).unwrap(),
            vec!["`a`", "`d`.`c`", "`d`"]
        );
    }

    #[test]
    fn nested_struct_without_tags_still_emits_its_field() {
        let mut pkg = Package::new(PKG, "models");
        let string = other(&mut pkg, "string");
        let plain = declare(&mut pkg, "Plain", vec![("V", string, "")]);
        declare(&mut pkg, "Holder", vec![("P", plain, r#"k:"p""#)]);

        assert_eq!(extract_tags(&pkg, &cfg("Holder", "k")).unwrap(), vec!["`p`"]);
    }

    #[test]
    fn empty_struct_yields_no_lines() {
        let mut pkg = Package::new(PKG, "models");
        declare(&mut pkg, "Empty", vec![]);
        assert!(extract_tags(&pkg, &cfg("Empty", "k")).unwrap().is_empty());
    }

    #[test]
    fn targets_outside_the_package_yield_no_lines() {
        let mut pkg = Package::new(PKG, "models");
        let string = other(&mut pkg, "string");
        declare(&mut pkg, "User", vec![("Name", string, r#"k:"n""#)]);

        for target in [
            "example.com/other.User",
            "User",
            "example.com/app/models.sub/pkg.User",
        ] {
            let cfg = TagsConfig::new(target, "k", None).unwrap();
            assert!(extract_tags(&pkg, &cfg).unwrap().is_empty(), "{target}");
        }
    }

    #[test]
    fn unknown_local_name_is_not_found() {
        let pkg = Package::new(PKG, "models");
        let err = extract_tags(&pkg, &cfg("Ghost", "k")).unwrap_err();
        assert!(
            matches!(&err, AnalysisError::StructNotFound { name, package } if name == "Ghost" && package == PKG),
            "{err:?}"
        );
    }

    #[test]
    fn non_struct_target_is_reported_with_its_type() {
        let mut pkg = Package::new(PKG, "models");
        let names = other(&mut pkg, "[]string");
        let named = pkg.types_mut().alloc(Type::Named {
            name: QualifiedName::new(PKG, "Names"),
            underlying: names,
        });
        pkg.declare("Names", named);

        let err = extract_tags(&pkg, &cfg("Names", "k")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "this type is not a struct: example.com/app/models.Names"
        );
    }

    #[test]
    fn target_behind_pointer_declaration_resolves() {
        let mut pkg = Package::new(PKG, "models");
        let string = other(&mut pkg, "string");
        let user = declare(&mut pkg, "User", vec![("Name", string, r#"k:"n""#)]);
        let ptr = pkg.types_mut().alloc(Type::Pointer(user));
        let handle = pkg.types_mut().alloc(Type::Named {
            name: QualifiedName::new(PKG, "UserRef"),
            underlying: ptr,
        });
        pkg.declare("UserRef", handle);

        assert_eq!(extract_tags(&pkg, &cfg("UserRef", "k")).unwrap(), vec!["`n`"]);
    }

    #[test]
    fn self_nesting_is_reported_instead_of_recursing() {
        let mut pkg = Package::new(PKG, "models");
        let string = other(&mut pkg, "string");
        let node = pkg.types_mut().reserve();
        let next = pkg.types_mut().alloc(Type::Pointer(node));
        define(
            &mut pkg,
            node,
            "Node",
            vec![("Value", string, r#"k:"v""#), ("Next", next, r#"k:"next""#)],
        );

        let err = extract_tags(&pkg, &cfg("Node", "k")).unwrap_err();
        match err {
            AnalysisError::CyclicStructure { path } => {
                assert_eq!(path, vec![format!("{PKG}.Node"), "Next".to_string()]);
            }
            unexpected => panic!("unexpected error: {unexpected:?}"),
        }
    }

    #[test]
    fn untagged_self_reference_is_not_followed() {
        let mut pkg = Package::new(PKG, "models");
        let string = other(&mut pkg, "string");
        let node = pkg.types_mut().reserve();
        let next = pkg.types_mut().alloc(Type::Pointer(node));
        define(
            &mut pkg,
            node,
            "Node",
            vec![("Value", string, r#"k:"v""#), ("Next", next, r#"k:"-""#)],
        );

        assert_eq!(extract_tags(&pkg, &cfg("Node", "k")).unwrap(), vec!["`v`"]);
    }
}
