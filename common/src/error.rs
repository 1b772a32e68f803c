use thiserror::Error;

/// Failures of the struct and tag analyses.
///
/// All of them are final for the run; nothing here is retried.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("-struct option is required")]
    MissingStruct,

    #[error("-key option is required")]
    MissingKey,

    #[error("struct {name} not found in package {package}")]
    StructNotFound { name: String, package: String },

    #[error("this type is not a struct: {ty}")]
    NotAStruct { ty: String },

    /// A nested struct expands into itself, directly or through pointers.
    #[error("cyclic struct nesting: {}", path.join(" -> "))]
    CyclicStructure { path: Vec<String> },
}
