//! Error types for the scene graph.
//!
//! Usage mistakes on the tree and the router (removing a detached node,
//! focusing a node outside the scene) are silent no-ops and never surface
//! here. `SceneError` covers the things a caller can act on, such as malformed
//! configuration or a layout callback that tried to resize its own node.

use thiserror::Error;

use crate::widget::NodeId;

/// Errors that can occur in the scene graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A layout callback tried to resize the node whose layout is running.
    #[error("layout of node {node} attempted to resize it while laying out its children")]
    ReentrantLayout {
        /// Node whose resize was rejected.
        node: NodeId,
    },

    /// Keystroke descriptor could not be parsed.
    #[error("invalid keystroke: {0}")]
    InvalidKeyStroke(String),

    /// Name pattern is not a valid regular expression.
    #[error("invalid name pattern: {0}")]
    InvalidPattern(String),

    /// Scene configuration is malformed.
    #[error("invalid scene config: {0}")]
    InvalidConfig(String),

    /// Scene configuration file could not be read.
    #[error("config io error: {0}")]
    Io(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SceneError::ReentrantLayout { node: NodeId::new(7) };
        assert_eq!(
            err.to_string(),
            "layout of node #7 attempted to resize it while laying out its children"
        );

        let err = SceneError::InvalidKeyStroke("ctrl+".into());
        assert_eq!(err.to_string(), "invalid keystroke: ctrl+");
    }
}
