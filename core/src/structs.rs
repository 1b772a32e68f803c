//! Lists the struct declarations of a package.

use tagscope_common::model::Package;
use tracing::{debug, info};

use crate::resolver;

/// Qualified names of every declaration whose type resolves to a struct,
/// sorted byte-wise so repeated runs print the same thing.
pub fn enumerate_structs(pkg: &Package) -> Vec<String> {
    let mut structs: Vec<String> = pkg
        .declarations()
        .filter(|decl| resolver::is_struct(pkg, decl.ty))
        .map(|decl| {
            let name = pkg.qualified_name(decl).to_string();
            debug!("struct {name}");
            name
        })
        .collect();
    structs.sort();

    info!(
        "{} of {} declarations in {} are structs",
        structs.len(),
        pkg.len(),
        pkg.path()
    );
    structs
}
