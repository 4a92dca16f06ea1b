/// Errors that can occur across the burrow workspace.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette` diagnostics at the
/// boundary.
///
/// # Examples
///
/// ```
/// use burrow_core::BurrowError;
///
/// let err = BurrowError::Config("missing GitHub token".into());
/// assert!(err.to_string().contains("missing GitHub token"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum BurrowError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration, including bad PR references.
    #[error("configuration error: {0}")]
    Config(String),

    /// The remote review source could not be reached or rejected the request.
    ///
    /// This is the only error that aborts a run outright; a malformed
    /// individual comment is always recovered locally instead.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
