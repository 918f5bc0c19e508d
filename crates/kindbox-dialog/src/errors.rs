use thiserror::Error;

// Errores de los handlers del bot.
//
// Los fallos de validación de la entrada del usuario no llegan aquí: se
// resuelven dentro del handler con un mensaje de reintento. Este enum solo
// transporta fallos de infraestructura, que el pool registra sin enviar el
// texto del error al usuario.
#[derive(Error, Debug)]
pub enum BotError {
  /// Fallos del almacén de estados o del router.
  #[error("Error de estado: {0}")]
  Fsm(#[from] fsm::FsmError),

  /// Fallos del repositorio de donantes/localidades.
  #[error("Error de dominio: {0}")]
  Domain(#[from] kindbox_domain::DomainError),

  /// El transporte no pudo entregar un mensaje o leer un perfil.
  #[error("Error de transporte: {0}")]
  Transport(String),

  /// Variables de entorno inválidas.
  #[error("Error de configuracion: {0}")]
  Config(String),

  #[error("Otro error: {0}")]
  Other(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
