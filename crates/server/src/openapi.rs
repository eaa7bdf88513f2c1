use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MoneyResponse { pub money: i64 }

#[derive(ToSchema)]
pub struct ErrorResponse { pub error: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::counter::click,
        crate::routes::counter::money,
    ),
    components(
        schemas(
            HealthResponse,
            MoneyResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "counter")
    )
)]
pub struct ApiDoc;
