//! Error taxonomy for scene operations.
//!
//! Read sites fail closed (they return `None`/`false`) instead of producing
//! these errors; mutating operations and construction report them.

/// Errors produced by the node store, tree mutations and construction paths.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// No node is registered under this name.
    #[error("no node named `{0}`")]
    NotFound(String),
    /// The handle's node was destroyed, or its type tag does not match.
    #[error("handle `{0}` no longer refers to a live node of the expected type")]
    InvalidHandle(String),
    /// A node with this name already exists.
    #[error("a node named `{0}` already exists")]
    NameCollision(String),
    /// Attaching `child` under `parent` would create an ancestor cycle.
    #[error("attaching `{child}` under `{parent}` would create a cycle")]
    CycleRejected { parent: String, child: String },
    /// Construction config omits a mandatory field.
    #[error("missing required field `{0}`")]
    MissingRequiredField(&'static str),
    /// No constructor is registered for this type tag.
    #[error("unknown node type `{0}`")]
    UnknownType(String),
    /// An anchor string did not name one of the nine anchor points.
    #[error("invalid anchor `{0}`")]
    InvalidAnchor(String),
    /// A config document failed to parse.
    #[error("invalid config document: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T, E = SceneError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_subject() {
        let err = SceneError::CycleRejected {
            parent: "a".into(),
            child: "root".into(),
        };
        assert_eq!(
            err.to_string(),
            "attaching `root` under `a` would create a cycle"
        );
        assert_eq!(
            SceneError::MissingRequiredField("name").to_string(),
            "missing required field `name`"
        );
    }

    #[test]
    fn json_errors_convert() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: SceneError = parse.unwrap_err().into();
        assert!(matches!(err, SceneError::Config(_)));
    }
}
