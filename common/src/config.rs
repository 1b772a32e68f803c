use crate::error::AnalysisError;

/// Tag value that suppresses a field when no `--ignore` is given.
pub const DEFAULT_IGNORE: &str = "-";

/// Controls how a directory of Go sources is turned into a [`Package`](crate::model::Package).
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Import path of the package.
    ///
    /// When absent it is derived from the enclosing `go.mod`.
    pub package_path: Option<String>,
    /// Also read `_test.go` files that belong to the same package.
    pub include_tests: bool,
}

/// Inputs of a tag extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsConfig {
    /// Fully qualified struct name, e.g. `example.com/pkg/name.StructName`.
    pub target: String,
    pub key: String,
    pub ignore: String,
}

impl TagsConfig {
    pub fn new(
        target: impl Into<String>,
        key: impl Into<String>,
        ignore: Option<String>,
    ) -> Result<Self, AnalysisError> {
        let target: String = target.into();
        let key: String = key.into();

        if target.is_empty() {
            return Err(AnalysisError::MissingStruct);
        }
        if key.is_empty() {
            return Err(AnalysisError::MissingKey);
        }

        Ok(Self {
            target,
            key,
            ignore: ignore.unwrap_or_else(|| DEFAULT_IGNORE.to_string()),
        })
    }
}
