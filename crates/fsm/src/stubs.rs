// Archivo: stubs.rs
// Propósito: implementación en memoria del `StateStore` para pruebas y
// wiring rápido. No es durable.
use crate::domain::{ActorContext, ConversationState, DataPatch, StateData, StateTag};
use crate::errors::Result;
use crate::repository::StateStore;
use dashmap::DashMap;

/// Almacén de estados en memoria.
///
/// Usa un `DashMap`, así cada operación bloquea sólo la entrada del
/// contexto afectado y contextos distintos no se serializan entre sí.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    states: DashMap<ActorContext, ConversationState>,
}

impl InMemoryStateStore {
    /// Crea un almacén vacío.
    pub fn new() -> Self {
        Self { states: DashMap::new() }
    }

    /// Número de contextos con registro.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl StateStore for InMemoryStateStore {
    fn get_state(&self, ctx: &ActorContext) -> Result<StateTag> {
        Ok(self.states.get(ctx).map(|s| s.state.clone()).unwrap_or_default())
    }

    fn get_data(&self, ctx: &ActorContext) -> Result<StateData> {
        Ok(self.states.get(ctx).map(|s| s.data.clone()).unwrap_or_default())
    }

    fn set_state(&self, ctx: &ActorContext, state: StateTag) -> Result<()> {
        self.states.entry(ctx.clone()).or_default().state = state;
        Ok(())
    }

    fn merge_data(&self, ctx: &ActorContext, patch: DataPatch) -> Result<()> {
        if patch.is_empty() {
            return Ok(());
        }
        self.states.entry(ctx.clone()).or_default().data.apply(&patch);
        Ok(())
    }

    fn load(&self, ctx: &ActorContext) -> Result<ConversationState> {
        Ok(self.states.get(ctx).map(|s| s.value().clone()).unwrap_or_default())
    }
}
