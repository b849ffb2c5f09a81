use api_errors::Problem;
use utoipa::OpenApi;

use crate::api::rest::dto::{
    ActivityDto, DeleteSalespersonResponse, ForceDeletedDto, IdentityDto, OwnedDependenciesDto,
    ProspectDto, ReminderDto, SalespersonDto, SalespersonListDto, UserDto,
};
use crate::api::rest::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_salespersons,
        handlers::get_salesperson,
        handlers::owned_dependencies,
        handlers::delete_salesperson,
    ),
    components(schemas(
        Problem,
        DeleteSalespersonResponse,
        ForceDeletedDto,
        SalespersonDto,
        UserDto,
        SalespersonListDto,
        IdentityDto,
        ProspectDto,
        ActivityDto,
        ReminderDto,
        OwnedDependenciesDto,
    )),
    tags((name = "salespersons", description = "Salesperson lookup and cascade deletion"))
)]
pub struct SalespersonsApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_all_routes() {
        let doc = SalespersonsApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/salespersons"));
        assert!(doc.paths.paths.contains_key("/salespersons/{id}"));
        assert!(doc.paths.paths.contains_key("/salespersons/{id}/prospects"));
    }
}
