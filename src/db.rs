pub mod profile_repo;
pub use profile_repo::ProfileRepository;
pub mod crm_repo;
pub use crm_repo::CrmRepository;
pub mod regions_repo;
pub use regions_repo::RegionsRepository;
