use crate::bot::Bot;
use crate::config::BotConfig;
use crate::errors::{BotError, Result};
use crate::transport::{OutboundMessage, Transport};
use fsm::{ActorId, InMemoryStateStore, UserProfile};
use kindbox_domain::DomainStubs;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Transporte en memoria: guarda cada mensaje enviado y responde perfiles
/// registrados de antemano. Puede simular caídas de envío.
#[derive(Debug, Default)]
pub struct RecordingTransport {
  sent: Mutex<Vec<(ActorId, OutboundMessage)>>,
  profiles: Mutex<HashMap<ActorId, UserProfile>>,
  failing: AtomicBool,
}

impl RecordingTransport {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock_map<'a, T>(&'a self, m: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>> {
    m.lock().map_err(|e| BotError::Transport(format!("mutex {} envenenado: {}", name, e)))
  }

  pub fn add_profile(&self, actor_id: ActorId, profile: UserProfile) -> Result<()> {
    self.lock_map(&self.profiles, "profiles")?.insert(actor_id, profile);
    Ok(())
  }

  /// A partir de ahora `send` falla (o vuelve a funcionar).
  pub fn set_failing(&self, failing: bool) {
    self.failing.store(failing, Ordering::SeqCst);
  }

  /// Mensajes enviados a `actor_id`, en orden.
  pub fn sent_to(&self, actor_id: ActorId) -> Vec<OutboundMessage> {
    match self.lock_map(&self.sent, "sent") {
      Ok(sent) => sent.iter().filter(|(a, _)| *a == actor_id).map(|(_, m)| m.clone()).collect(),
      Err(_) => Vec::new(),
    }
  }

  pub fn last_to(&self, actor_id: ActorId) -> Option<OutboundMessage> {
    self.sent_to(actor_id).pop()
  }

  pub fn total_sent(&self) -> usize {
    self.lock_map(&self.sent, "sent").map(|s| s.len()).unwrap_or(0)
  }
}

impl Transport for RecordingTransport {
  fn send(&self, actor_id: ActorId, message: OutboundMessage) -> Result<()> {
    if self.failing.load(Ordering::SeqCst) {
      return Err(BotError::Transport(format!("envío simulado fallido para {}", actor_id)));
    }
    self.lock_map(&self.sent, "sent")?.push((actor_id, message));
    Ok(())
  }

  fn fetch_user_profile(&self, actor_id: ActorId) -> Result<UserProfile> {
    self.lock_map(&self.profiles, "profiles")?
        .get(&actor_id)
        .cloned()
        .ok_or_else(|| BotError::Transport(format!("perfil desconocido para {}", actor_id)))
  }
}

pub struct DialogStubs;

impl DialogStubs {
  /// Bot completamente en memoria con las localidades de ejemplo.
  pub fn in_memory_bot(transport: Arc<RecordingTransport>, config: BotConfig) -> Result<Bot> {
    Ok(Bot::new(Arc::new(InMemoryStateStore::new()),
                Arc::new(DomainStubs::sample_repo()?),
                transport,
                config))
  }
}
