#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to load evaluation config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid alias configuration: {0}")]
    Aliases(#[from] bigsky_domain::Error),

    #[error("Invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

pub type Result<A> = std::result::Result<A, Error>;
