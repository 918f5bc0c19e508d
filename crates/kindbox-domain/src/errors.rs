// error.rs
use crate::phone::ParsingError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
  #[error("Error de validación: {0}")]
  ValidationError(String),
  #[error("Error de almacenamiento: {0}")]
  StorageError(String),
}

impl From<ParsingError> for DomainError {
  fn from(e: ParsingError) -> Self {
    Self::ValidationError(e.to_string())
  }
}
