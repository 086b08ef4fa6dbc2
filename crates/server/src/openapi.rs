use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct TodoDoc { pub key: u64, pub message: String, pub done: bool }

#[derive(ToSchema)]
pub struct TodoInputDoc { pub message: String, pub done: Option<bool> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::status,
        crate::routes::todos::list,
        crate::routes::todos::find,
        crate::routes::todos::insert,
        crate::routes::todos::update,
        crate::routes::todos::delete,
    ),
    components(
        schemas(
            TodoDoc,
            TodoInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "todos")
    )
)]
pub struct ApiDoc;
