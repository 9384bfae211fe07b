use axum::{Router, response::Redirect, routing::get};
use log::info;

/// Routes of the exposition surface.
///
/// Only the root path is owned here; every other path is left to the rest of
/// the application. Requests are independent and touch no shared state.
pub fn router() -> Router {
    Router::new().route("/", get(index))
}

/// Redirects the root path to the generated API documentation page.
async fn index() -> Redirect {
    info!("swagger-ui.html");
    Redirect::temporary("swagger-ui.html")
}
