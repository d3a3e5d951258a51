//! Error taxonomy for layout calls.
//!
//! Every failure is reported before any coordinates are produced; a layout
//! call never returns a partial result.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    /// An edge names a node id that is not in the node set.
    #[error("edge '{edge}' references unknown node '{node}'")]
    UnknownNodeReference { edge: String, node: String },

    #[error("node id '{0}' is defined more than once")]
    DuplicateNode(String),

    /// The graph has a directed cycle and cycle breaking was not requested.
    /// `edges` lists every edge inside a strongly connected component.
    #[error("graph contains a cycle through edges [{}]", .edges.join(", "))]
    CyclicGraph { edges: Vec<String> },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("malformed graph description: {0}")]
    MalformedInput(#[from] serde_json::Error),
}

impl LayoutError {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        LayoutError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;
