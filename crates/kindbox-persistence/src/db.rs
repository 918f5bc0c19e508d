use crate::errors::PersistenceError;
use crate::{DieselDomainRepository, DieselStateStore};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::Arc;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub(crate) type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub(crate) type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

// Cada conexión del pool espera hasta 5s por el lock de escritura y hace
// cumplir las claves foráneas.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(conn)
                                                     .map_err(diesel::r2d2::Error::QueryError)?;
    diesel::sql_query("PRAGMA foreign_keys = ON;").execute(conn)
                                                   .map_err(diesel::r2d2::Error::QueryError)?;
    Ok(())
  }
}

/// Base de datos SQLite compartida por el almacén de estados y el
/// repositorio de dominio. Clonar es barato (comparte el pool).
#[derive(Clone)]
pub struct Database {
  pool: Arc<DbPool>,
}

impl Database {
  /// Abre (o crea) la base en `database_url` y aplica las migraciones
  /// embebidas.
  pub fn open(database_url: &str) -> Result<Self, PersistenceError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder().max_size(4)
                              .connection_customizer(Box::new(SqlitePragmas))
                              .build(manager)?;
    let mut conn = pool.get()?;
    // WAL falla en bases en memoria; se ignora igual que el resultado de la
    // consulta.
    let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut conn);
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::Migration(e.to_string()))?;
    log::info!("base de datos lista en {}", database_url);
    Ok(Self { pool: Arc::new(pool) })
  }

  pub(crate) fn conn(&self) -> Result<DbConn, PersistenceError> {
    Ok(self.pool.get()?)
  }

  /// Almacén de estados conversacionales sobre esta base.
  pub fn state_store(&self) -> DieselStateStore {
    DieselStateStore::new(self.clone())
  }

  /// Repositorio de donantes y localidades sobre esta base.
  pub fn domain_repo(&self) -> DieselDomainRepository {
    DieselDomainRepository::new(self.clone())
  }
}
