mod tree_error;

pub use tree_error::TreeError;

/// Workspace-wide result alias.
pub type TrellisResult<T> = Result<T, TreeError>;
