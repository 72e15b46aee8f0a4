use poem::{handler, web::Json, IntoResponse};
use serde::Serialize;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
}

#[handler]
pub async fn get_health() -> impl IntoResponse {
    Json(HealthStatus { status: "ok" })
}
