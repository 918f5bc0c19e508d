use crate::domain_repository::{DomainRepository, InMemoryDomainRepository};
use crate::{DomainError, Municipality};

pub struct DomainStubs;

impl DomainStubs {
    /// Localidades de ejemplo usadas por demos y pruebas.
    pub const SAMPLE_MUNICIPALITIES: [&'static str; 3] = ["Тольятти", "Самара", "Жигулёвск"];

    /// Crea un repositorio en memoria con las localidades de ejemplo.
    pub fn sample_repo() -> Result<InMemoryDomainRepository, DomainError> {
        let repo = InMemoryDomainRepository::new();
        Self::seed_municipalities(&repo, &Self::SAMPLE_MUNICIPALITIES)?;
        Ok(repo)
    }

    /// Inserta las localidades que todavía no existen y devuelve cuántas se
    /// crearon. Sirve para cualquier `DomainRepository`.
    pub fn seed_municipalities<R>(repo: &R, names: &[&str]) -> Result<usize, DomainError>
        where R: DomainRepository + ?Sized
    {
        let mut created = 0;
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            if repo.find_municipality_by_name(name)?.is_none() {
                repo.save_municipality(Municipality::new(name)?)?;
                created += 1;
            }
        }
        Ok(created)
    }
}
