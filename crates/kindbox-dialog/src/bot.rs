use crate::config::BotConfig;
use crate::errors::Result;
use crate::flows;
use crate::transport::{OutboundMessage, Transport};
use crate::BotError;
use fsm::{ActorContext, Router, StateAccess, StateStore};
use kindbox_domain::DomainRepository;
use std::sync::Arc;

/// Router del bot: handlers de registro y menú principal sobre `Bot`.
pub type BotRouter = Router<Bot, BotError>;

/// Servicios que reciben todos los handlers: estado conversacional,
/// repositorio de dominio, transporte y configuración.
#[derive(Clone)]
pub struct Bot {
  states: Arc<dyn StateStore>,
  domain: Arc<dyn DomainRepository>,
  transport: Arc<dyn Transport>,
  config: BotConfig,
}

impl Bot {
  pub fn new(states: Arc<dyn StateStore>,
             domain: Arc<dyn DomainRepository>,
             transport: Arc<dyn Transport>,
             config: BotConfig)
             -> Self {
    Self { states,
           domain,
           transport,
           config }
  }

  pub fn domain(&self) -> &dyn DomainRepository {
    self.domain.as_ref()
  }

  pub fn transport(&self) -> &dyn Transport {
    self.transport.as_ref()
  }

  pub fn config(&self) -> &BotConfig {
    &self.config
  }

  /// Envía `message` al actor del contexto.
  pub fn send(&self, ctx: &ActorContext, message: OutboundMessage) -> Result<()> {
    self.transport.send(ctx.actor_id, message)
  }
}

impl StateAccess for Bot {
  fn state_store(&self) -> &dyn StateStore {
    self.states.as_ref()
  }
}

/// Construye el router con todos los flujos registrados.
pub fn build_router(bot: Bot) -> Result<BotRouter> {
  let mut router = Router::new(bot);
  flows::registration::register(&mut router)?;
  flows::home::register(&mut router)?;
  Ok(router)
}
