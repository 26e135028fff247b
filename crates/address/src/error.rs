use thiserror::Error;

pub type Result<T> = std::result::Result<T, AddressError>;

#[derive(Error, Debug)]
pub enum AddressError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("District accounts unavailable: {0}")]
    AccountSource(String),
}
