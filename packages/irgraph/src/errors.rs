//! Error types for irgraph.
//!
//! The builder assumes a structurally valid IR; the only errors it raises
//! are precondition violations that would otherwise corrupt the graph.

use thiserror::Error;

/// Main error type for graph construction.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Block linking needs the block's first/last instruction; an empty
    /// block has neither.
    #[error("function '{function}': block {block} has no instructions")]
    EmptyBlock { function: String, block: u32 },

    /// One builder must see each function exactly once, or its sentinel
    /// pair would be duplicated.
    #[error("function '{function}' was already processed by this builder")]
    FunctionAlreadyProcessed { function: String },
}

/// Result type alias for graph construction.
pub type Result<T> = std::result::Result<T, GraphError>;
