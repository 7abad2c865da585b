use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::finalize::FinalizeEngine;

#[derive(Deserialize, ToSchema)]
pub struct FinalizeRequest {
    /// Date to finalize; omit to finalize today. Past dates backfill.
    #[schema(example = "2026-01-05", format = "date", value_type = String, nullable = true)]
    pub date: Option<NaiveDate>,
}

/// Finalize a whole day (manual trigger / backfill)
#[utoipa::path(
    post,
    path = "/api/attendance/finalize",
    request_body = FinalizeRequest,
    responses(
        (status = 200, description = "Batch ran (or day was gated off)", body = Object, example = json!({
            "processed": 42, "skipped": 3, "present": 30, "half_day": 2, "absent": 4,
            "leave": 2, "pending_correction": 0, "incomplete": 1, "errors": 0,
            "auto_finalized": 1
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Finalization"
)]
pub async fn finalize_day(
    engine: web::Data<FinalizeEngine>,
    payload: web::Json<FinalizeRequest>,
) -> actix_web::Result<impl Responder> {
    let date = payload.date.unwrap_or_else(|| engine.today());

    let outcome = engine.finalize_day(date).await.map_err(|e| {
        tracing::error!(error = %e, %date, "finalization batch failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if let Some(stats) = outcome.stats() {
        if stats.errors > 0 {
            // Partial progress is valid; surface the error count as a
            // warning rather than an HTTP failure.
            tracing::warn!(%date, errors = stats.errors, "finalization completed with errors");
        }
    }
    Ok(HttpResponse::Ok().json(outcome))
}

/// Finalize a single employee's day (admin correction flow)
#[utoipa::path(
    post,
    path = "/api/attendance/finalize/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee to finalize")
    ),
    request_body = FinalizeRequest,
    responses(
        (status = 200, description = "Employee finalized or skipped", body = Object, example = json!({
            "employee_id": 1000,
            "date": "2026-01-05",
            "result": "finalized: absent"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Finalization"
)]
pub async fn finalize_employee(
    engine: web::Data<FinalizeEngine>,
    path: web::Path<u64>,
    payload: web::Json<FinalizeRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let date = payload.date.unwrap_or_else(|| engine.today());

    let transition = engine.finalize_employee(employee_id, date).await.map_err(|e| {
        tracing::error!(error = %e, employee_id, %date, "employee finalization failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "employee_id": employee_id,
        "date": date,
        "result": transition.to_string()
    })))
}
