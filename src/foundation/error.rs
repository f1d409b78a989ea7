/// Convenience result type used across tableau.
pub type TableauResult<T> = Result<T, TableauError>;

/// Top-level error taxonomy used by scene, animation and frame-loop APIs.
///
/// Every variant is raised synchronously by the call that violates an invariant. None of them is
/// recovered automatically; the host decides whether to skip, rename, or abort.
#[derive(thiserror::Error, Debug)]
pub enum TableauError {
    /// A different node already occupies the requested name under the parent.
    #[error("duplicate name error: {0}")]
    DuplicateName(String),

    /// The requested insertion would make a node its own ancestor.
    #[error("cycle error: {0}")]
    Cycle(String),

    /// A node, child or animation job could not be found.
    #[error("not found error: {0}")]
    NotFound(String),

    /// Transform, animation or configuration parameter outside its valid domain.
    #[error("invalid parameter error: {0}")]
    InvalidParameter(String),

    /// Unrecoverable drawing-surface failure. Stops the frame loop.
    #[error("surface error: {0}")]
    Surface(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TableauError {
    /// Build a [`TableauError::DuplicateName`] value.
    pub fn duplicate_name(msg: impl Into<String>) -> Self {
        Self::DuplicateName(msg.into())
    }

    /// Build a [`TableauError::Cycle`] value.
    pub fn cycle(msg: impl Into<String>) -> Self {
        Self::Cycle(msg.into())
    }

    /// Build a [`TableauError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`TableauError::InvalidParameter`] value.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Build a [`TableauError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Whether this error must stop the frame loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Surface(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
