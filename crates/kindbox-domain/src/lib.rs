mod domain_repository;
mod domain_stubs;
mod donor;
mod errors;
mod municipality;
pub mod phone;

pub use domain_repository::{DomainRepository, InMemoryDomainRepository};
pub use domain_stubs::DomainStubs;
pub use donor::{Donor, MAX_ORGANIZATION_NAME_LEN};
pub use errors::DomainError;
pub use municipality::Municipality;
pub use phone::{parse_phone_number, ParsingError, PhoneNumber};
