// donor.rs
use crate::{DomainError, Municipality, PhoneNumber};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Longitud máxima (en caracteres) del nombre de organización.
pub const MAX_ORGANIZATION_NAME_LEN: usize = 500;

/// Registro terminado de un participante. Referencia su localidad por id,
/// sin copiar sus campos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
  id: Uuid,
  user_id: i64,
  name: String,
  phone_number: PhoneNumber,
  organization_name: Option<String>,
  municipality_id: Uuid,
  registered_at: DateTime<Utc>,
}

impl Donor {
  /// Crea un donante nuevo para `municipality`.
  pub fn new(user_id: i64,
             name: &str,
             phone_number: PhoneNumber,
             organization_name: Option<String>,
             municipality: &Municipality)
             -> Result<Self, DomainError> {
    Self::from_parts(Uuid::new_v4(),
                     user_id,
                     name,
                     phone_number,
                     organization_name,
                     municipality.id(),
                     Utc::now())
  }

  /// Reconstruye un donante persistido.
  pub fn from_parts(id: Uuid,
                    user_id: i64,
                    name: &str,
                    phone_number: PhoneNumber,
                    organization_name: Option<String>,
                    municipality_id: Uuid,
                    registered_at: DateTime<Utc>)
                    -> Result<Self, DomainError> {
    if let Some(org) = &organization_name {
      if org.chars().count() > MAX_ORGANIZATION_NAME_LEN {
        return Err(DomainError::ValidationError(format!("El nombre de la organización supera {} caracteres",
                                                        MAX_ORGANIZATION_NAME_LEN)));
      }
    }
    Ok(Self { id,
              user_id,
              name: name.to_string(),
              phone_number,
              organization_name,
              municipality_id,
              registered_at })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn user_id(&self) -> i64 {
    self.user_id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn phone_number(&self) -> &PhoneNumber {
    &self.phone_number
  }

  pub fn organization_name(&self) -> Option<&str> {
    self.organization_name.as_deref()
  }

  pub fn municipality_id(&self) -> Uuid {
    self.municipality_id
  }

  pub fn registered_at(&self) -> DateTime<Utc> {
    self.registered_at
  }
}

impl fmt::Display for Donor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f,
           "Donor(user_id: {}, name: {}, phone: {}, organization: {}, municipality: {})",
           self.user_id,
           self.name,
           self.phone_number,
           self.organization_name.as_deref().unwrap_or("-"),
           self.municipality_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parse_phone_number;

  #[test]
  fn donor_references_municipality_by_id() {
    let m = Municipality::new("Город").unwrap();
    let d = Donor::new(1, "Иван Петров", parse_phone_number("89991234567").unwrap(), None, &m).unwrap();
    assert_eq!(d.municipality_id(), m.id());
    assert_eq!(d.organization_name(), None);
  }

  #[test]
  fn organization_name_length_is_counted_in_chars() {
    let m = Municipality::new("Город").unwrap();
    let phone = parse_phone_number("89991234567").unwrap();
    let ok = "я".repeat(MAX_ORGANIZATION_NAME_LEN);
    assert!(Donor::new(1, "x", phone.clone(), Some(ok), &m).is_ok());
    let too_long = "я".repeat(MAX_ORGANIZATION_NAME_LEN + 1);
    assert!(matches!(Donor::new(1, "x", phone, Some(too_long), &m), Err(DomainError::ValidationError(_))));
  }
}
