//! kindbox-dialog: flujos conversacionales del bot
//!
//! Conecta el `fsm::Router` con los servicios del bot (estado, repositorio de
//! donantes y localidades, transporte) y define los flujos de usuario:
//! registro completo y menú principal. Incluye el sub-diálogo de
//! confirmación sí/no y un pool que despacha eventos en paralelo por actor.

pub mod bot;
pub mod config;
pub mod confirmation;
pub mod errors;
pub mod flows;
pub mod keyboards;
pub mod messages;
pub mod pool;
pub mod stubs;
pub mod transport;

pub use bot::{build_router, Bot, BotRouter};
pub use config::BotConfig;
pub use errors::BotError;
pub use pool::DispatchPool;
pub use stubs::{DialogStubs, RecordingTransport};
pub use transport::{ChoiceSet, OutboundMessage, Transport};
