use crate::errors::Result;
use fsm::{ActorId, UserProfile};
use serde::{Deserialize, Serialize};

/// Teclado: filas ordenadas de etiquetas. Un conjunto vacío pide al
/// transporte quitar el teclado actual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSet {
  pub rows: Vec<Vec<String>>,
}

impl ChoiceSet {
  pub fn new(rows: Vec<Vec<String>>) -> Self {
    Self { rows }
  }

  /// Teclado vacío (oculta los botones).
  pub fn empty() -> Self {
    Self::default()
  }

  /// Una fila con las etiquetas dadas.
  pub fn single_row(labels: &[&str]) -> Self {
    Self { rows: vec![labels.iter().map(|l| l.to_string()).collect()] }
  }

  pub fn is_empty(&self) -> bool {
    self.rows.iter().all(|r| r.is_empty())
  }

  pub fn labels(&self) -> impl Iterator<Item = &str> {
    self.rows.iter().flatten().map(String::as_str)
  }
}

/// Mensaje saliente. `choices == None` deja el teclado que el usuario ya
/// tiene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
  pub text: String,
  pub choices: Option<ChoiceSet>,
}

impl OutboundMessage {
  pub fn text(text: impl Into<String>) -> Self {
    Self { text: text.into(),
           choices: None }
  }

  pub fn with_choices(text: impl Into<String>, choices: ChoiceSet) -> Self {
    Self { text: text.into(),
           choices: Some(choices) }
  }
}

/// Canal de chat hacia el usuario.
pub trait Transport: Send + Sync {
  /// Envía `message` al actor.
  fn send(&self, actor_id: ActorId, message: OutboundMessage) -> Result<()>;

  /// Nombre y apellido del actor según el transporte. Se usa cuando el
  /// evento no trae perfil.
  fn fetch_user_profile(&self, actor_id: ActorId) -> Result<UserProfile>;
}
