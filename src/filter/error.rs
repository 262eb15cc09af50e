use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("{max} must be bigger than {min}")]
    InvalidRange { min: &'static str, max: &'static str },
}
