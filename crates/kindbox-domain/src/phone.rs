// phone.rs
//
// Validador puro de números de teléfono: texto -> `PhoneNumber` normalizado
// o `ParsingError`. Acepta números rusos escritos como `+7…`, `7…` u `8…`
// seguidos de diez dígitos; ignora espacios, guiones, puntos y paréntesis.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-\.\(\)]").expect("regex de separadores"));
static RU_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\+7|7|8)([0-9]{10})$").expect("regex de teléfono"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParsingError {
  #[error("texto vacío")]
  Empty,
  #[error("no es un número de teléfono: {0}")]
  Malformed(String),
}

/// Número normalizado a `+7XXXXXXXXXX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for PhoneNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl TryFrom<String> for PhoneNumber {
  type Error = ParsingError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    parse_phone_number(&value)
  }
}

impl From<PhoneNumber> for String {
  fn from(p: PhoneNumber) -> Self {
    p.0
  }
}

/// Convierte texto libre en un `PhoneNumber`.
pub fn parse_phone_number(text: &str) -> Result<PhoneNumber, ParsingError> {
  let trimmed = text.trim();
  if trimmed.is_empty() {
    return Err(ParsingError::Empty);
  }
  let compact = SEPARATORS.replace_all(trimmed, "");
  let caps = RU_NUMBER.captures(&compact).ok_or_else(|| ParsingError::Malformed(trimmed.to_string()))?;
  Ok(PhoneNumber(format!("+7{}", &caps[1])))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_common_spellings() {
    for raw in ["+7 (999) 123-45-67", "89991234567", "79991234567", "8 999 123 45 67", " +7.999.123.45.67 "] {
      let p = parse_phone_number(raw).unwrap_or_else(|e| panic!("{} -> {}", raw, e));
      assert_eq!(p.as_str(), "+79991234567");
    }
  }

  #[test]
  fn rejects_garbage() {
    assert_eq!(parse_phone_number("   "), Err(ParsingError::Empty));
    for raw in ["привет", "12345", "+1 999 123 45 67", "8999123456", "899912345678", "8 999 abc 45 67"] {
      assert!(matches!(parse_phone_number(raw), Err(ParsingError::Malformed(_))), "{} debería fallar", raw);
    }
  }

  #[test]
  fn serde_roundtrip_goes_through_validation() {
    let p = parse_phone_number("89991234567").unwrap();
    let v = serde_json::to_value(&p).unwrap();
    assert_eq!(v, serde_json::json!("+79991234567"));
    assert!(serde_json::from_value::<PhoneNumber>(serde_json::json!("nope")).is_err());
  }
}
