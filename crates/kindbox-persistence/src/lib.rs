//! Persistencia durable (Diesel + SQLite) para el bot.
//! Expone `Database`, que abre la base y aplica migraciones embebidas, y
//! dos repositorios sobre el mismo pool: `DieselStateStore` (estado
//! conversacional, trait `fsm::StateStore`) y `DieselDomainRepository`
//! (donantes y localidades, trait `kindbox_domain::DomainRepository`).

mod db;
mod domain_persistence;
mod errors;
pub mod schema;
mod state_persistence;

pub use db::{Database, MIGRATIONS};
pub use domain_persistence::DieselDomainRepository;
pub use errors::PersistenceError;
pub use state_persistence::DieselStateStore;
