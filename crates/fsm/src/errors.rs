// Archivo: errors.rs
// Propósito: definir los errores de la máquina de estados y el alias
// Result<T> usado por las APIs del crate.
use thiserror::Error;
/// Errores comunes del almacenamiento de estados y del router.
///
/// - `NotFound`: entidad no encontrada.
/// - `Conflict`: registro duplicado o estado inconsistente.
/// - `Storage`: error al acceder al almacenamiento externo.
#[derive(Error, Debug)]
pub enum FsmError {
  /// Entidad no encontrada.
  #[error("No encontrado: {0}")]
  NotFound(String),
  /// Conflicto (por ejemplo, dos handlers para el mismo par).
  #[error("Conflicto: {0}")]
  Conflict(String),
  /// Error genérico de almacenamiento (BD, mutex envenenado, etc.).
  #[error("Error de almacenamiento: {0}")]
  Storage(String),
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, FsmError>;
