use thiserror::Error;

use crate::text::FontStyle;

pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors surfaced by the renderer and its drawing surfaces.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The owned drawing surface has already been released.
    #[error("drawing surface has been disposed")]
    Disposed,

    /// Peek or pop on an empty boundable stack.
    #[error("boundable stack is empty")]
    EmptyBoundableStack,

    /// The font family carries no metrics for the requested style.
    #[error("font metrics unavailable for {family} ({style:?})")]
    MetricsUnavailable { family: String, style: FontStyle },

    /// Restore was called with a token that is not on the save stack.
    #[error("graphics state is not on the save stack")]
    UnknownGraphicsState,

    /// Opaque failure reported by the drawing backend.
    #[error("drawing backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub(crate) fn backend(message: impl Into<String>) -> Self {
        RenderError::Backend(message.into().into())
    }
}

#[cfg(feature = "cairo")]
impl From<cairo::Error> for RenderError {
    fn from(err: cairo::Error) -> Self {
        RenderError::Backend(Box::new(err))
    }
}

#[cfg(feature = "cairo")]
impl From<cairo::BorrowError> for RenderError {
    fn from(err: cairo::BorrowError) -> Self {
        RenderError::Backend(Box::new(err))
    }
}

#[cfg(feature = "svg")]
impl From<png::EncodingError> for RenderError {
    fn from(err: png::EncodingError) -> Self {
        RenderError::Backend(Box::new(err))
    }
}

#[cfg(feature = "svg")]
impl From<png::DecodingError> for RenderError {
    fn from(err: png::DecodingError) -> Self {
        RenderError::Backend(Box::new(err))
    }
}
