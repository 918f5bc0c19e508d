// municipality.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Localidad que participa en la campaña. El nombre es la clave con la que
/// el usuario la elige en el teclado.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Municipality {
  id: Uuid,
  name: String,
}

impl Municipality {
  pub fn new(name: &str) -> Result<Self, DomainError> {
    Self::from_parts(Uuid::new_v4(), name)
  }

  /// Reconstruye una localidad persistida conservando su id.
  pub fn from_parts(id: Uuid, name: &str) -> Result<Self, DomainError> {
    if name.trim().is_empty() {
      return Err(DomainError::ValidationError("El nombre de la localidad no puede estar vacío".to_string()));
    }
    Ok(Self { id, name: name.to_string() })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

impl fmt::Display for Municipality {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Municipality({}, {})", self.name, self.id)
  }
}
