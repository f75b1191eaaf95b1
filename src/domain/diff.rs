//! Staged deploy diff.

/// Name of the staged diff file inside the working directory.
pub const DIFF_FILE_NAME: &str = "diff";

/// Source difference applied by this deploy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffRecord {
    pub content: String,
    pub is_first_deploy: bool,
}

impl DiffRecord {
    /// Build the record from the staged file contents, `None` when no file
    /// was staged.
    #[must_use]
    pub fn from_staged(contents: Option<String>) -> Self {
        match contents {
            Some(content) => Self {
                content,
                is_first_deploy: false,
            },
            None => Self {
                content: String::new(),
                is_first_deploy: true,
            },
        }
    }
}
