/// Failure to produce a report document.
///
/// No partial output is ever returned alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The report data is missing something the layout needs.
    #[error("Invalid report data: {0}")]
    InvalidInput(String),

    #[error("Layout error: {0}")]
    Layout(String),

    /// Serializing the laid-out pages to PDF failed.
    #[error("Render error: {0}")]
    Render(String),
}
