//! Skip accounting for unsupported schema paths

use std::fmt;

use crate::error::UnsupportedError;

/// A schema path dropped from the output because it is unsupported
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SkipIssue {
    pub component: String,
    pub path: String,
    pub reason: String,
}

impl SkipIssue {
    /// User-facing warning line
    pub fn warning(&self) -> String {
        format!(
            "warning: skipped unsupported schema path \"{}\" for component \"{}\": {}",
            self.path, self.component, self.reason
        )
    }

    fn sort_key(&self) -> (&str, &str, &str) {
        (&self.path, &self.reason, &self.component)
    }
}

impl From<UnsupportedError> for SkipIssue {
    fn from(err: UnsupportedError) -> Self {
        Self {
            component: err.component,
            path: err.path,
            reason: err.summary,
        }
    }
}

impl fmt::Display for SkipIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.warning())
    }
}

/// Sort by `(path, reason, component)` and drop duplicates
pub fn finalize_skips(mut issues: Vec<SkipIssue>) -> Vec<SkipIssue> {
    issues.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    issues.dedup();
    issues
}
