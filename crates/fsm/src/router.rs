// Archivo: router.rs
// Propósito: implementar el `Router`, que resuelve el estado persistido del
// actor y ejecuta el único handler registrado para `(namespace, estado)`.
//
// Nota: el router no guarda nada entre eventos. La etiqueta se relee del
// `StateStore` en cada `dispatch`, por lo que un reinicio del proceso entre
// dos eventos no cambia la selección del handler.
use crate::domain::{FlowNamespace, InboundEvent, StateTag};
use crate::errors::FsmError;
use crate::repository::StateAccess;
use std::collections::HashMap;

/// Handler de un paso: función libre que recibe los servicios y el evento.
pub type HandlerFn<C, E> = fn(&C, &InboundEvent) -> std::result::Result<(), E>;

/// Resultado de despachar un evento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Se ejecutó el handler registrado para `state`.
    Handled { state: StateTag },
    /// No hay handler para `state` en el namespace del evento.
    Dropped { state: StateTag },
}

impl Dispatch {
    pub fn is_handled(&self) -> bool {
        matches!(self, Dispatch::Handled { .. })
    }
}

/// Router explícito: tabla `(namespace, estado) -> handler` más el
/// contenedor de servicios inyectado (`C`), que da acceso al `StateStore`.
///
/// `E` es el error de los handlers; debe poder construirse desde
/// `FsmError` para propagar fallos de lectura del estado.
pub struct Router<C, E> {
    services: C,
    handlers: HashMap<(FlowNamespace, StateTag), HandlerFn<C, E>>,
}

impl<C, E> Router<C, E> where C: StateAccess,
                              E: From<FsmError>
{
    /// Crea un router vacío sobre los servicios dados.
    pub fn new(services: C) -> Self {
        Self { services,
               handlers: HashMap::new() }
    }

    /// Registra `handler` para `(namespace, state)`. Falla con
    /// `FsmError::Conflict` si el par ya tiene handler.
    pub fn register(&mut self,
                    namespace: FlowNamespace,
                    state: StateTag,
                    handler: HandlerFn<C, E>)
                    -> crate::errors::Result<()> {
        let key = (namespace, state);
        if self.handlers.contains_key(&key) {
            return Err(FsmError::Conflict(format!("ya existe un handler para {}/{}", key.0, key.1)));
        }
        self.handlers.insert(key, handler);
        Ok(())
    }

    /// Variante encadenable de `register`.
    pub fn with_handler(mut self,
                        namespace: FlowNamespace,
                        state: StateTag,
                        handler: HandlerFn<C, E>)
                        -> crate::errors::Result<Self> {
        self.register(namespace, state, handler)?;
        Ok(self)
    }

    pub fn is_registered(&self, namespace: &FlowNamespace, state: &StateTag) -> bool {
        self.handlers.contains_key(&(namespace.clone(), state.clone()))
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn services(&self) -> &C {
        &self.services
    }

    /// Despacha un evento: lee el estado actual del contexto y ejecuta como
    /// máximo un handler. Sin handler registrado el evento se descarta sin
    /// efectos.
    pub fn dispatch(&self, event: &InboundEvent) -> std::result::Result<Dispatch, E> {
        let ctx = event.context();
        let state = self.services.state_store().get_state(&ctx)?;
        match self.handlers.get(&(ctx.namespace.clone(), state.clone())) {
            Some(handler) => {
                handler(&self.services, event)?;
                Ok(Dispatch::Handled { state })
            }
            None => {
                log::debug!("evento descartado para {} en estado {}", ctx, state);
                Ok(Dispatch::Dropped { state })
            }
        }
    }
}
