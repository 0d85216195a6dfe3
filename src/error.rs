use thiserror::Error;

/// Structural mismatches between the parser's assumptions and the input
/// layout. These abort the run; nothing is written.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("table-of-contents marker not found: '{marker}'")]
    TocMarkerNotFound { marker: String },

    #[error("body start anchor not found: /{anchor}/")]
    BodyAnchorNotFound { anchor: String },

    #[error(
        "detected {found} section headers, need at least {required}; \
         the header grammar may no longer match the input layout"
    )]
    InsufficientHeadings { found: usize, required: usize },
}
