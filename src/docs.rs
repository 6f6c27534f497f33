// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Saúde / Usuário ---
        handlers::auth::health,
        handlers::auth::get_me,

        // --- CRM ---
        handlers::crm::list_records,
        handlers::crm::create_record,
        handlers::crm::update_record,
        handlers::crm::update_record_status,
        handlers::crm::delete_record,
        handlers::crm::list_city_options,

        // --- Configuração ---
        handlers::regions::list_regions,
        handlers::regions::list_cities,
        handlers::regions::toggle_city,
    ),
    components(
        schemas(
            // --- Status ---
            models::status::PlanilhaStatus,
            models::status::Inviabilidade,
            models::status::CancelSubtype,
            models::status::StatusTriple,

            // --- CRM ---
            models::crm::Tipo,
            models::crm::CrmRecord,
            models::crm::CrmRecordView,
            models::crm::StatusCount,
            models::crm::CrmSummary,
            models::crm::CrmListing,
            models::crm::StatusChangeResponse,
            models::crm::SaveRecordPayload,
            models::crm::UpdateStatusPayload,

            // --- Configuração ---
            models::regions::Region,
            models::regions::CityOption,
            models::regions::CityListing,
            models::regions::CitiesOverview,
            models::regions::CityToggleResponse,

            // --- Auth ---
            models::auth::Actor,
        )
    ),
    tags(
        (name = "Health", description = "Disponibilidade do serviço"),
        (name = "Users", description = "Dados do usuário autenticado"),
        (name = "CRM", description = "Registros de vendas e leads"),
        (name = "Configuração", description = "Cidades e regiões atendidas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::builder()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/health",
            "/api/me",
            "/api/crm/records",
            "/api/crm/records/{id}",
            "/api/crm/records/{id}/status",
            "/api/crm/cities",
            "/api/config/regions",
            "/api/config/cities",
            "/api/config/cities/{id}/toggle",
        ] {
            assert!(paths.contains_key(path), "{path}");
        }
    }

    #[test]
    fn protected_routes_require_the_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("api_jwt"));

        let records = &doc.paths.paths["/api/crm/records"];
        assert!(records.get.as_ref().unwrap().security.is_some());

        let health = &doc.paths.paths["/api/health"];
        assert!(health.get.as_ref().unwrap().security.is_none());
    }
}
