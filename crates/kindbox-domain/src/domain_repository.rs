use crate::DomainError;
use crate::{Donor, Municipality};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Trait que define operaciones de persistencia para las entidades
/// terminadas (donantes y localidades).
pub trait DomainRepository: Send + Sync {
    /// Guarda (upsert por id) una localidad y devuelve su `Uuid`. Falla con
    /// `ValidationError` si otra localidad ya usa el mismo nombre.
    fn save_municipality(&self, municipality: Municipality) -> Result<Uuid, DomainError>;

    /// Busca una localidad por nombre exacto (sensible a mayúsculas).
    fn find_municipality_by_name(&self, name: &str) -> Result<Option<Municipality>, DomainError>;

    /// Recupera una localidad por su `Uuid`.
    fn get_municipality(&self, id: &Uuid) -> Result<Option<Municipality>, DomainError>;

    /// Lista todas las localidades ordenadas por nombre.
    fn list_municipalities(&self) -> Result<Vec<Municipality>, DomainError>;

    /// Elimina una localidad. No permite eliminarla si algún donante la
    /// referencia; en ese caso retorna `ValidationError`.
    fn delete_municipality(&self, id: &Uuid) -> Result<(), DomainError>;

    /// Guarda (upsert por id) un donante. Falla con `ValidationError` si ya
    /// existe otro donante para el mismo `user_id` o si la localidad
    /// referenciada no existe.
    fn save_donor(&self, donor: Donor) -> Result<Uuid, DomainError>;

    /// Busca el donante registrado por un usuario del transporte.
    fn find_donor_by_user_id(&self, user_id: i64) -> Result<Option<Donor>, DomainError>;

    /// Lista todos los donantes (útil para pruebas).
    fn list_donors(&self) -> Result<Vec<Donor>, DomainError>;
}

/// Implementación en memoria para tests y desarrollo.
pub struct InMemoryDomainRepository {
    municipalities: Arc<Mutex<HashMap<Uuid, Municipality>>>,
    donors: Arc<Mutex<HashMap<Uuid, Donor>>>,
}

impl InMemoryDomainRepository {
    pub fn new() -> Self {
        Self { municipalities: Arc::new(Mutex::new(HashMap::new())),
               donors: Arc::new(Mutex::new(HashMap::new())) }
    }

    // Helper to map poisoned mutex errors into DomainError
    fn lock_map<'a, T>(&'a self, m: &'a Mutex<T>, name: &str) -> Result<std::sync::MutexGuard<'a, T>, DomainError> {
        m.lock()
         .map_err(|e| DomainError::StorageError(format!("Mutex '{}' poisoned: {}", name, e)))
    }
}

impl DomainRepository for InMemoryDomainRepository {
    fn save_municipality(&self, municipality: Municipality) -> Result<Uuid, DomainError> {
        let id = municipality.id();
        let mut map = self.lock_map(&self.municipalities, "municipalities")?;
        if map.values().any(|m| m.name() == municipality.name() && m.id() != id) {
            return Err(DomainError::ValidationError(format!("La localidad '{}' ya existe", municipality.name())));
        }
        map.insert(id, municipality);
        Ok(id)
    }

    fn find_municipality_by_name(&self, name: &str) -> Result<Option<Municipality>, DomainError> {
        let map = self.lock_map(&self.municipalities, "municipalities")?;
        Ok(map.values().find(|m| m.name() == name).cloned())
    }

    fn get_municipality(&self, id: &Uuid) -> Result<Option<Municipality>, DomainError> {
        let map = self.lock_map(&self.municipalities, "municipalities")?;
        Ok(map.get(id).cloned())
    }

    fn list_municipalities(&self) -> Result<Vec<Municipality>, DomainError> {
        let map = self.lock_map(&self.municipalities, "municipalities")?;
        let mut out: Vec<Municipality> = map.values().cloned().collect();
        out.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(out)
    }

    fn delete_municipality(&self, id: &Uuid) -> Result<(), DomainError> {
        // Check donors
        let donors = self.lock_map(&self.donors, "donors")?;
        if donors.values().any(|d| &d.municipality_id() == id) {
            return Err(DomainError::ValidationError(format!("No se puede eliminar la localidad {}; tiene donantes", id)));
        }
        drop(donors);
        let mut map = self.lock_map(&self.municipalities, "municipalities")?;
        map.remove(id);
        Ok(())
    }

    fn save_donor(&self, donor: Donor) -> Result<Uuid, DomainError> {
        if self.get_municipality(&donor.municipality_id())?.is_none() {
            return Err(DomainError::ValidationError(format!("Localidad {} no encontrada", donor.municipality_id())));
        }
        let id = donor.id();
        let mut donors = self.lock_map(&self.donors, "donors")?;
        if donors.values().any(|d| d.user_id() == donor.user_id() && d.id() != id) {
            return Err(DomainError::ValidationError(format!("El usuario {} ya está registrado", donor.user_id())));
        }
        donors.insert(id, donor);
        Ok(id)
    }

    fn find_donor_by_user_id(&self, user_id: i64) -> Result<Option<Donor>, DomainError> {
        let donors = self.lock_map(&self.donors, "donors")?;
        Ok(donors.values().find(|d| d.user_id() == user_id).cloned())
    }

    fn list_donors(&self) -> Result<Vec<Donor>, DomainError> {
        let donors = self.lock_map(&self.donors, "donors")?;
        Ok(donors.values().cloned().collect())
    }
}

impl Default for InMemoryDomainRepository {
    fn default() -> Self {
        Self::new()
    }
}
