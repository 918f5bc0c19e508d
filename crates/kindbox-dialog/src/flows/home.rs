// Archivo: home.rs
// Propósito: menú principal, estado de reposo del donante registrado. La
// elección de destinatarios no existe todavía: esas opciones vuelven a
// mostrar el menú.
use crate::bot::{Bot, BotRouter};
use crate::errors::Result;
use crate::keyboards::{self, HomeChoice};
use crate::messages;
use crate::transport::OutboundMessage;
use fsm::{ActorContext, FlowNamespace, InboundEvent, StateAccess, StateTag};

pub const HOME: StateTag = StateTag::from_static("home.home");

pub fn register(router: &mut BotRouter) -> fsm::Result<()> {
  router.register(FlowNamespace::USER, HOME, home)
}

/// Muestra el menú principal y deja el contexto en `HOME`.
pub fn send_home(bot: &Bot, ctx: &ActorContext) -> Result<()> {
  bot.send(ctx,
           OutboundMessage::with_choices(messages::HOME, keyboards::home_keyboard()))?;
  bot.state_store().set_state(ctx, HOME)?;
  Ok(())
}

pub fn home(bot: &Bot, event: &InboundEvent) -> Result<()> {
  let ctx = event.context();
  match HomeChoice::from_label(&event.text) {
    Some(HomeChoice::GiftsInfo) => bot.send(&ctx, OutboundMessage::text(messages::gifts_info(&bot.config().deadline))),
    Some(choice) => {
      log::debug!("opción {:?} sin implementar para {}", choice, ctx);
      send_home(bot, &ctx)
    }
    None => send_home(bot, &ctx),
  }
}
