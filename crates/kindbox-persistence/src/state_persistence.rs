use crate::db::Database;
use crate::errors::PersistenceError;
use crate::schema::conversation_states::dsl as cs;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use fsm::{ActorContext, DataPatch, FsmError, StateData, StateStore, StateTag};

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = crate::schema::conversation_states)]
struct ConversationRow {
  pub actor_id: i64,
  pub namespace: String,
  pub state_tag: String,
  pub data: String,
  pub updated_at_ts: i64,
}

/// `StateStore` durable: una fila por `(actor_id, namespace)`. Las
/// escrituras leen y modifican la fila dentro de una transacción `IMMEDIATE`,
/// que toma el lock de escritura antes de leer.
pub struct DieselStateStore {
  db: Database,
}

impl DieselStateStore {
  pub fn new(db: Database) -> Self {
    DieselStateStore { db }
  }
}

fn load_row(conn: &mut SqliteConnection, ctx: &ActorContext) -> QueryResult<Option<ConversationRow>> {
  cs::conversation_states.filter(cs::actor_id.eq(ctx.actor_id))
                         .filter(cs::namespace.eq(ctx.namespace.as_str()))
                         .first::<ConversationRow>(conn)
                         .optional()
}

fn decode_data(raw: &str) -> Result<StateData, PersistenceError> {
  Ok(serde_json::from_str(raw)?)
}

fn new_row(ctx: &ActorContext, state: &StateTag, data: &StateData) -> Result<ConversationRow, PersistenceError> {
  Ok(ConversationRow { actor_id: ctx.actor_id,
                       namespace: ctx.namespace.as_str().to_string(),
                       state_tag: state.as_str().to_string(),
                       data: serde_json::to_string(data)?,
                       updated_at_ts: Utc::now().timestamp_millis() })
}

impl StateStore for DieselStateStore {
  fn get_state(&self, ctx: &ActorContext) -> fsm::Result<StateTag> {
    let mut conn = self.db.conn()?;
    let tag = cs::conversation_states.filter(cs::actor_id.eq(ctx.actor_id))
                                     .filter(cs::namespace.eq(ctx.namespace.as_str()))
                                     .select(cs::state_tag)
                                     .first::<String>(&mut conn)
                                     .optional()
                                     .map_err(PersistenceError::from)?;
    Ok(tag.map(StateTag::new).unwrap_or_default())
  }

  fn get_data(&self, ctx: &ActorContext) -> fsm::Result<StateData> {
    let mut conn = self.db.conn()?;
    let raw = cs::conversation_states.filter(cs::actor_id.eq(ctx.actor_id))
                                     .filter(cs::namespace.eq(ctx.namespace.as_str()))
                                     .select(cs::data)
                                     .first::<String>(&mut conn)
                                     .optional()
                                     .map_err(PersistenceError::from)?;
    match raw {
      Some(r) => Ok(decode_data(&r)?),
      None => Ok(StateData::new()),
    }
  }

  fn set_state(&self, ctx: &ActorContext, state: StateTag) -> fsm::Result<()> {
    let mut conn = self.db.conn()?;
    conn.immediate_transaction(|conn| -> Result<(), PersistenceError> {
          match load_row(conn, ctx)? {
            Some(_) => {
              diesel::update(cs::conversation_states.filter(cs::actor_id.eq(ctx.actor_id))
                                                    .filter(cs::namespace.eq(ctx.namespace.as_str())))
                .set((cs::state_tag.eq(state.as_str()), cs::updated_at_ts.eq(Utc::now().timestamp_millis())))
                .execute(conn)?;
            }
            None => {
              let row = new_row(ctx, &state, &StateData::new())?;
              diesel::insert_into(cs::conversation_states).values(&row).execute(conn)?;
            }
          }
          Ok(())
        })
        .map_err(FsmError::from)
  }

  fn merge_data(&self, ctx: &ActorContext, patch: DataPatch) -> fsm::Result<()> {
    if patch.is_empty() {
      return Ok(());
    }
    let mut conn = self.db.conn()?;
    conn.immediate_transaction(|conn| -> Result<(), PersistenceError> {
          match load_row(conn, ctx)? {
            Some(row) => {
              let mut data = decode_data(&row.data)?;
              data.apply(&patch);
              diesel::update(cs::conversation_states.filter(cs::actor_id.eq(ctx.actor_id))
                                                    .filter(cs::namespace.eq(ctx.namespace.as_str())))
                .set((cs::data.eq(serde_json::to_string(&data)?), cs::updated_at_ts.eq(Utc::now().timestamp_millis())))
                .execute(conn)?;
            }
            None => {
              let mut data = StateData::new();
              data.apply(&patch);
              let row = new_row(ctx, &StateTag::NO_STATE, &data)?;
              diesel::insert_into(cs::conversation_states).values(&row).execute(conn)?;
            }
          }
          Ok(())
        })
        .map_err(FsmError::from)
  }
}
