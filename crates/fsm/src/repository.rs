// Archivo: repository.rs
// Propósito: definir el trait `StateStore`, el contrato que deben cumplir
// las persistencias del estado conversacional (en memoria, SQLite, etc.).
use crate::domain::{ActorContext, ConversationState, DataPatch, StateData, StateTag};
use crate::errors::Result;

/// Contrato del almacenamiento de estados por `ActorContext`.
///
/// Cada contexto tiene exactamente un registro lógico; si no existe se
/// comporta como `NO_STATE` con datos vacíos. Las operaciones sobre un
/// contexto nunca observan ni modifican otro contexto.
pub trait StateStore: Send + Sync {
    /// Etiqueta actual del contexto, `NO_STATE` si no hay registro.
    fn get_state(&self, ctx: &ActorContext) -> Result<StateTag>;

    /// Datos acumulados del contexto, vacíos si no hay registro.
    fn get_data(&self, ctx: &ActorContext) -> Result<StateData>;

    /// Reemplaza atómicamente la etiqueta. No toca los datos.
    fn set_state(&self, ctx: &ActorContext, state: StateTag) -> Result<()>;

    /// Fusiona atómicamente `patch` en los datos: claves ausentes intactas,
    /// claves con `null` borradas, el resto reemplazadas.
    fn merge_data(&self, ctx: &ActorContext, patch: DataPatch) -> Result<()>;

    /// Lee etiqueta y datos juntos.
    fn load(&self, ctx: &ActorContext) -> Result<ConversationState> {
        Ok(ConversationState { state: self.get_state(ctx)?,
                               data: self.get_data(ctx)? })
    }
}

/// Acceso al `StateStore` desde el contenedor de servicios que el router
/// pasa a los handlers.
pub trait StateAccess {
    fn state_store(&self) -> &dyn StateStore;
}
