pub mod access;
pub mod auth;
pub mod crm_service;
pub use crm_service::CrmService;
pub mod regions_service;
pub use regions_service::RegionsService;
