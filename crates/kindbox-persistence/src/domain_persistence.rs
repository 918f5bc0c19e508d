use crate::db::Database;
use crate::errors::PersistenceError;
use crate::schema;
use crate::schema::donors::dsl as donors_dsl;
use crate::schema::municipalities::dsl as mun_dsl;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use kindbox_domain::{parse_phone_number, DomainError, DomainRepository, Donor, Municipality};
use uuid::Uuid;

// Diesel row structs
#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::municipalities)]
struct MunicipalityRow {
  pub id: String,
  pub name: String,
}
#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::donors)]
struct DonorRow {
  pub id: String,
  pub user_id: i64,
  pub name: String,
  pub phone_number: String,
  pub organization_name: Option<String>,
  pub municipality_id: String,
  pub registered_at_ts: i64,
}

fn parse_uuid(raw: &str) -> Result<Uuid, PersistenceError> {
  Uuid::parse_str(raw).map_err(|e| PersistenceError::Corrupt(format!("uuid inválido '{}': {}", raw, e)))
}

impl TryFrom<MunicipalityRow> for Municipality {
  type Error = PersistenceError;

  fn try_from(r: MunicipalityRow) -> Result<Self, Self::Error> {
    Ok(Municipality::from_parts(parse_uuid(&r.id)?, &r.name)?)
  }
}

impl TryFrom<DonorRow> for Donor {
  type Error = PersistenceError;

  fn try_from(r: DonorRow) -> Result<Self, Self::Error> {
    let phone = parse_phone_number(&r.phone_number).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
    let registered_at = DateTime::<Utc>::from_timestamp_millis(r.registered_at_ts)
      .ok_or_else(|| PersistenceError::Corrupt(format!("timestamp inválido: {}", r.registered_at_ts)))?;
    Ok(Donor::from_parts(parse_uuid(&r.id)?,
                         r.user_id,
                         &r.name,
                         phone,
                         r.organization_name,
                         parse_uuid(&r.municipality_id)?,
                         registered_at)?)
  }
}

impl From<&Donor> for DonorRow {
  fn from(d: &Donor) -> Self {
    DonorRow { id: d.id().to_string(),
               user_id: d.user_id(),
               name: d.name().to_string(),
               phone_number: d.phone_number().to_string(),
               organization_name: d.organization_name().map(|s| s.to_string()),
               municipality_id: d.municipality_id().to_string(),
               registered_at_ts: d.registered_at().timestamp_millis() }
  }
}

/// Repo Diesel que implementa `DomainRepository`.
pub struct DieselDomainRepository {
  db: Database,
}

impl DieselDomainRepository {
  pub fn new(db: Database) -> Self {
    DieselDomainRepository { db }
  }
}

impl DomainRepository for DieselDomainRepository {
  fn save_municipality(&self, municipality: Municipality) -> Result<Uuid, DomainError> {
    let mut conn = self.db.conn()?;
    let id_s = municipality.id().to_string();
    let row = MunicipalityRow { id: id_s.clone(),
                                name: municipality.name().to_string() };
    conn.immediate_transaction(|conn| -> Result<(), PersistenceError> {
          let clash = mun_dsl::municipalities.filter(mun_dsl::name.eq(&row.name))
                                             .filter(mun_dsl::id.ne(&id_s))
                                             .select(mun_dsl::id)
                                             .first::<String>(conn)
                                             .optional()?;
          if clash.is_some() {
            return Err(DomainError::ValidationError(format!("La localidad '{}' ya existe", row.name)).into());
          }
          let updated = diesel::update(mun_dsl::municipalities.filter(mun_dsl::id.eq(&id_s)))
            .set(mun_dsl::name.eq(&row.name))
            .execute(conn)?;
          if updated == 0 {
            diesel::insert_into(mun_dsl::municipalities).values(&row).execute(conn)?;
          }
          Ok(())
        })?;
    Ok(municipality.id())
  }

  fn find_municipality_by_name(&self, name: &str) -> Result<Option<Municipality>, DomainError> {
    let mut conn = self.db.conn()?;
    let opt = mun_dsl::municipalities.filter(mun_dsl::name.eq(name))
                                     .first::<MunicipalityRow>(&mut conn)
                                     .optional()
                                     .map_err(PersistenceError::from)?;
    Ok(opt.map(Municipality::try_from).transpose()?)
  }

  fn get_municipality(&self, id: &Uuid) -> Result<Option<Municipality>, DomainError> {
    let mut conn = self.db.conn()?;
    let opt = mun_dsl::municipalities.filter(mun_dsl::id.eq(id.to_string()))
                                     .first::<MunicipalityRow>(&mut conn)
                                     .optional()
                                     .map_err(PersistenceError::from)?;
    Ok(opt.map(Municipality::try_from).transpose()?)
  }

  fn list_municipalities(&self) -> Result<Vec<Municipality>, DomainError> {
    let mut conn = self.db.conn()?;
    let rows = mun_dsl::municipalities.order(mun_dsl::name.asc())
                                      .load::<MunicipalityRow>(&mut conn)
                                      .map_err(PersistenceError::from)?;
    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
      out.push(Municipality::try_from(r)?);
    }
    Ok(out)
  }

  fn delete_municipality(&self, id: &Uuid) -> Result<(), DomainError> {
    let mut conn = self.db.conn()?;
    let id_s = id.to_string();
    conn.immediate_transaction(|conn| -> Result<(), PersistenceError> {
          let referenced = donors_dsl::donors.filter(donors_dsl::municipality_id.eq(&id_s))
                                             .select(donors_dsl::id)
                                             .first::<String>(conn)
                                             .optional()?;
          if referenced.is_some() {
            return Err(DomainError::ValidationError(format!("No se puede eliminar la localidad {}; tiene donantes",
                                                            id_s)).into());
          }
          diesel::delete(mun_dsl::municipalities.filter(mun_dsl::id.eq(&id_s))).execute(conn)?;
          Ok(())
        })?;
    Ok(())
  }

  fn save_donor(&self, donor: Donor) -> Result<Uuid, DomainError> {
    let mut conn = self.db.conn()?;
    let row = DonorRow::from(&donor);
    conn.immediate_transaction(|conn| -> Result<(), PersistenceError> {
          let municipality = mun_dsl::municipalities.filter(mun_dsl::id.eq(&row.municipality_id))
                                                    .select(mun_dsl::id)
                                                    .first::<String>(conn)
                                                    .optional()?;
          if municipality.is_none() {
            return Err(DomainError::ValidationError(format!("Localidad {} no encontrada", row.municipality_id)).into());
          }
          let other = donors_dsl::donors.filter(donors_dsl::user_id.eq(row.user_id))
                                        .filter(donors_dsl::id.ne(&row.id))
                                        .select(donors_dsl::id)
                                        .first::<String>(conn)
                                        .optional()?;
          if other.is_some() {
            return Err(DomainError::ValidationError(format!("El usuario {} ya está registrado", row.user_id)).into());
          }
          let updated = diesel::update(donors_dsl::donors.filter(donors_dsl::id.eq(&row.id)))
            .set((donors_dsl::name.eq(&row.name),
                  donors_dsl::phone_number.eq(&row.phone_number),
                  donors_dsl::organization_name.eq(&row.organization_name),
                  donors_dsl::municipality_id.eq(&row.municipality_id)))
            .execute(conn)?;
          if updated == 0 {
            diesel::insert_into(donors_dsl::donors).values(&row).execute(conn)?;
          }
          Ok(())
        })?;
    Ok(donor.id())
  }

  fn find_donor_by_user_id(&self, user_id: i64) -> Result<Option<Donor>, DomainError> {
    let mut conn = self.db.conn()?;
    let opt = donors_dsl::donors.filter(donors_dsl::user_id.eq(user_id))
                                .first::<DonorRow>(&mut conn)
                                .optional()
                                .map_err(PersistenceError::from)?;
    Ok(opt.map(Donor::try_from).transpose()?)
  }

  fn list_donors(&self) -> Result<Vec<Donor>, DomainError> {
    let mut conn = self.db.conn()?;
    let rows = donors_dsl::donors.order(donors_dsl::registered_at_ts.asc())
                                 .load::<DonorRow>(&mut conn)
                                 .map_err(PersistenceError::from)?;
    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
      out.push(Donor::try_from(r)?);
    }
    Ok(out)
  }
}
