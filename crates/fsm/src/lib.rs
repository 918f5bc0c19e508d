//! Crate `fsm`: máquina de estados conversacional por actor
//!
//! Este crate define los tipos de valor de la conversación (`ActorContext`,
//! `StateTag`, `StateData`), el contrato de persistencia `StateStore`, una
//! implementación en memoria útil para pruebas (`InMemoryStateStore`) y el
//! `Router` que selecciona el único handler registrado para el par
//! `(namespace, estado)` del actor.
//!
//! Diseño resumido:
//! - El estado persistido es la única fuente de verdad: el router lo relee en
//!   cada evento y no cachea nada entre eventos.
//! - Los estados son datos (etiquetas), no código: el comportamiento vive en
//!   la tabla del router y en funciones handler independientes.
//! - Un evento cuyo estado no tiene handler se descarta en silencio; así se
//!   ignoran eventos duplicados o atrasados.
//!
//! Ejemplo rápido:
//! ```rust
//! use fsm::{ActorContext, FlowNamespace, InMemoryStateStore, StateStore, StateTag};
//! let store = InMemoryStateStore::new();
//! let ctx = ActorContext::new(1, FlowNamespace::USER);
//! assert_eq!(store.get_state(&ctx).unwrap(), StateTag::NO_STATE);
//! ```
pub mod domain;
pub mod errors;
pub mod repository;
pub mod router;
pub mod stubs;

pub use domain::*;
pub use errors::*;
pub use repository::*;
pub use router::*;
pub use stubs::*;
