// Archivo: confirmation.rs
// Propósito: sub-diálogo sí/no reutilizable. Quien lo invoca decide el
// estado en el que se recibirá la respuesta y qué hacer con ella; aquí solo
// se envía la pregunta, se fija ese estado y se clasifica el texto.
use crate::bot::Bot;
use crate::errors::Result;
use crate::keyboards::{self, Confirmation};
use crate::transport::OutboundMessage;
use fsm::{ActorContext, StateAccess, StateTag};

/// Envía `text` con los botones `Да`/`Нет` y deja el contexto en
/// `resume_state`, cuyo handler procesará la respuesta.
pub fn request_confirmation(bot: &Bot, ctx: &ActorContext, text: &str, resume_state: StateTag) -> Result<()> {
  bot.send(ctx, OutboundMessage::with_choices(text, keyboards::yes_no_keyboard()))?;
  bot.state_store().set_state(ctx, resume_state)?;
  Ok(())
}

/// Clasifica la respuesta. No tiene efectos.
pub fn handle_confirmation(text: &str) -> Confirmation {
  Confirmation::from_label(text)
}
