/// Failures while moving template variables in or out of the bag
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Template variable '{name}' could not be decoded")]
    MalformedVariable {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Template variable '{name}' could not be encoded")]
    SerializeVariable {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl HookError {
    /// Variable the failure is about
    pub fn variable(&self) -> &str {
        match self {
            HookError::MalformedVariable { name, .. } => name,
            HookError::SerializeVariable { name, .. } => name,
        }
    }
}
