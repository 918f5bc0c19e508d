// Archivo: pool.rs
// Propósito: procesar eventos de actores distintos en paralelo conservando
// el orden de llegada de cada actor. Cada worker tiene su cola y un actor
// siempre cae en la misma cola (`actor_id mod N`).
use crate::bot::BotRouter;
use crate::errors::{BotError, Result};
use fsm::InboundEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct DispatchPool {
  senders: Vec<mpsc::UnboundedSender<InboundEvent>>,
  workers: Vec<JoinHandle<()>>,
}

impl DispatchPool {
  /// Arranca `workers` hilos bloqueantes en el runtime de tokio actual.
  /// Debe llamarse dentro de un runtime.
  pub fn spawn(router: Arc<BotRouter>, workers: usize) -> Self {
    let n = workers.max(1);
    let mut senders = Vec::with_capacity(n);
    let mut handles = Vec::with_capacity(n);
    for idx in 0..n {
      let (tx, mut rx) = mpsc::unbounded_channel::<InboundEvent>();
      let router = Arc::clone(&router);
      handles.push(tokio::task::spawn_blocking(move || {
                     while let Some(event) = rx.blocking_recv() {
                       if let Err(e) = router.dispatch(&event) {
                         log::error!("worker {}: fallo procesando evento de {}: {}", idx, event.context(), e);
                       }
                     }
                     log::debug!("worker {} terminado", idx);
                   }));
      senders.push(tx);
    }
    Self { senders,
           workers: handles }
  }

  pub fn workers(&self) -> usize {
    self.senders.len()
  }

  /// Encola el evento en la cola de su actor.
  pub fn submit(&self, event: InboundEvent) -> Result<()> {
    let idx = event.actor_id.rem_euclid(self.senders.len() as i64) as usize;
    self.senders[idx].send(event)
                     .map_err(|e| BotError::Other(format!("cola {} cerrada; evento de {} perdido", idx, e.0.actor_id)))
  }

  /// Cierra las colas y espera a que los workers vacíen lo pendiente.
  pub async fn shutdown(self) -> Result<()> {
    drop(self.senders);
    for handle in self.workers {
      handle.await.map_err(|e| BotError::Other(format!("worker abortado: {}", e)))?;
    }
    Ok(())
  }
}
