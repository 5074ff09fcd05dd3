use axum::{routing::get, Json, Router};

use crate::models::GreetingResponse;

pub fn router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api", get(api_root))
}

async fn root() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello World".to_string(),
    })
}

async fn api_root() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello from the marketplace API".to_string(),
    })
}
