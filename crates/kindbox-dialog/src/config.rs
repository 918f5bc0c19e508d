use crate::errors::{BotError, Result};

pub const DEFAULT_DB_URL: &str = "kindbox.db";
pub const DEFAULT_DEADLINE: &str = "25 декабря";
pub const DEFAULT_WORKERS: usize = 4;

/// Configuración del bot leída del entorno (y de `.env` si existe).
///
/// Variables:
/// - `KINDBOX_DB_URL` (o `DATABASE_URL`): ruta de la base SQLite.
/// - `KINDBOX_DEADLINE`: fecha límite para entregar los regalos, tal como se
///   muestra al usuario.
/// - `KINDBOX_WORKERS`: hilos del pool de despacho (> 0).
/// - `KINDBOX_MUNICIPALITIES`: localidades iniciales separadas por comas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
  pub database_url: String,
  pub deadline: String,
  pub workers: usize,
  pub municipalities: Vec<String>,
}

impl Default for BotConfig {
  fn default() -> Self {
    Self { database_url: DEFAULT_DB_URL.to_string(),
           deadline: DEFAULT_DEADLINE.to_string(),
           workers: DEFAULT_WORKERS,
           municipalities: Vec::new() }
  }
}

impl BotConfig {
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Igual que `from_env` pero con una fuente de variables arbitraria.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where F: Fn(&str) -> Option<String>
  {
    let mut cfg = BotConfig::default();
    if let Some(url) = lookup("KINDBOX_DB_URL").or_else(|| lookup("DATABASE_URL")) {
      cfg.database_url = url;
    }
    if let Some(deadline) = lookup("KINDBOX_DEADLINE").filter(|d| !d.trim().is_empty()) {
      cfg.deadline = deadline.trim().to_string();
    }
    if let Some(raw) = lookup("KINDBOX_WORKERS") {
      cfg.workers = match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => return Err(BotError::Config(format!("KINDBOX_WORKERS inválido: '{}'", raw))),
      };
    }
    if let Some(raw) = lookup("KINDBOX_MUNICIPALITIES") {
      cfg.municipalities = raw.split(',')
                              .map(str::trim)
                              .filter(|n| !n.is_empty())
                              .map(str::to_string)
                              .collect();
    }
    Ok(cfg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |k| map.get(k).cloned()
  }

  #[test]
  fn defaults_when_nothing_is_set() {
    let cfg = BotConfig::from_lookup(|_| None).unwrap();
    assert_eq!(cfg, BotConfig::default());
  }

  #[test]
  fn reads_all_variables() {
    let cfg = BotConfig::from_lookup(lookup_from(&[("DATABASE_URL", "/tmp/other.db"),
                                                   ("KINDBOX_DEADLINE", " 20 декабря "),
                                                   ("KINDBOX_WORKERS", "8"),
                                                   ("KINDBOX_MUNICIPALITIES", "Самара, Тольятти,,")])).unwrap();
    assert_eq!(cfg.database_url, "/tmp/other.db");
    assert_eq!(cfg.deadline, "20 декабря");
    assert_eq!(cfg.workers, 8);
    assert_eq!(cfg.municipalities, vec!["Самара".to_string(), "Тольятти".to_string()]);
  }

  #[test]
  fn kindbox_db_url_wins_over_database_url() {
    let cfg = BotConfig::from_lookup(lookup_from(&[("DATABASE_URL", "a.db"), ("KINDBOX_DB_URL", "b.db")])).unwrap();
    assert_eq!(cfg.database_url, "b.db");
  }

  #[test]
  fn rejects_zero_workers() {
    let res = BotConfig::from_lookup(lookup_from(&[("KINDBOX_WORKERS", "0")]));
    assert!(matches!(res, Err(BotError::Config(_))));
  }
}
