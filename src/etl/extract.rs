//! Extractor trait for data extraction from various sources

use eyre::Result;

/// Extractor trait for extracting data from a source
///
/// Implementors define how to extract items from sources like
/// spreadsheet files or in-memory fixtures.
///
/// # Example
/// ```no_run
/// use roster_publisher::etl::Extractor;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct LinesExtractor {
///     path: PathBuf,
/// }
///
/// impl Extractor for LinesExtractor {
///     type Item = String;
///
///     async fn extract(&self) -> Result<Vec<Self::Item>> {
///         let text = std::fs::read_to_string(&self.path)?;
///         Ok(text.lines().map(str::to_string).collect())
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// The type of items extracted
    type Item: Send;

    /// Extract items from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (I/O, parsing, missing sheet, etc.)
    fn extract(&self) -> impl std::future::Future<Output = Result<Vec<Self::Item>>> + Send;
}
