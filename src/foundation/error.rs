pub type PlatenResult<T> = Result<T, PlatenError>;

/// Error taxonomy for spread composition.
///
/// Every variant except warnings-level conditions is fatal for the enclosing
/// spread: composition aborts and no partial canvas is returned.
#[derive(thiserror::Error, Debug)]
pub enum PlatenError {
    /// A referenced image fragment is missing or unreadable.
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    /// A logical font name did not resolve to loaded font data.
    #[error("font not found: {0}")]
    FontNotFound(String),

    /// Malformed or contradictory layout/config geometry.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// An element cannot be placed on the page at all.
    #[error("geometry violation: {0}")]
    GeometryViolation(String),

    /// Unanticipated internal failure; carries full diagnostic context.
    #[error("render failure: {0}")]
    RenderFailure(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlatenError {
    pub fn asset_not_found(msg: impl Into<String>) -> Self {
        Self::AssetNotFound(msg.into())
    }

    pub fn font_not_found(msg: impl Into<String>) -> Self {
        Self::FontNotFound(msg.into())
    }

    pub fn invalid_layout(msg: impl Into<String>) -> Self {
        Self::InvalidLayout(msg.into())
    }

    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::GeometryViolation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::RenderFailure(msg.into())
    }
}
