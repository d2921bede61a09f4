use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes of an export run, split so that callers can branch on the
/// outcome without parsing message text.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is required")]
    MissingInput(&'static str),

    #[error("Input table `{0}` does not exist")]
    SourceNotFound(String),

    #[error(transparent)]
    Runtime(#[from] anyhow::Error),
}
