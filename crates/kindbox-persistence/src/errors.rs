use fsm::FsmError;
use kindbox_domain::DomainError;
use thiserror::Error;

// Errores internos de la capa Diesel. Se traducen a `FsmError` o
// `DomainError` en el borde de cada repositorio.
#[derive(Error, Debug)]
pub enum PersistenceError {
  #[error("db: {0}")]
  Db(#[from] diesel::result::Error),
  #[error("pool: {0}")]
  Pool(#[from] r2d2::Error),
  #[error("migraciones: {0}")]
  Migration(String),
  #[error("datos corruptos: {0}")]
  Corrupt(String),
  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
  #[error(transparent)]
  Domain(#[from] DomainError),
}

impl From<PersistenceError> for FsmError {
  fn from(e: PersistenceError) -> Self {
    FsmError::Storage(e.to_string())
  }
}

impl From<PersistenceError> for DomainError {
  fn from(e: PersistenceError) -> Self {
    match e {
      PersistenceError::Domain(inner) => inner,
      other => DomainError::StorageError(other.to_string()),
    }
  }
}
