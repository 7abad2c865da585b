use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::finalize::ports::AttendanceRecordStore;
use crate::model::attendance::{
    AttendanceRecord, AttendanceStatus, BreakSession, LiveStatus,
};
use crate::store::SqlAttendanceStore;

#[derive(Deserialize, ToSchema)]
pub struct ClockRequest {
    #[schema(example = 1000)]
    pub employee_id: u64,
}

fn internal(e: anyhow::Error, employee_id: u64, what: &str) -> actix_web::Error {
    tracing::error!(error = %e, employee_id, "{what} failed");
    actix_web::error::ErrorInternalServerError("Internal Server Error")
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/clock-in",
    request_body = ClockRequest,
    responses(
        (status = 200, description = "Clocked in successfully", body = Object, example = json!({
            "message": "Clocked in successfully"
        })),
        (status = 400, description = "Already clocked in today", body = Object, example = json!({
            "message": "Already clocked in today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    store: web::Data<SqlAttendanceStore>,
    payload: web::Json<ClockRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;
    let now = Local::now().naive_local();

    let existing = store
        .find(employee_id, now.date())
        .await
        .map_err(|e| internal(e, employee_id, "clock-in lookup"))?;

    match existing {
        Some(record) if record.status.is_sealed() => {
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Day already finalized"
            })))
        }
        Some(record) if record.clock_in.is_some() => {
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Already clocked in today"
            })))
        }
        Some(mut record) => {
            record.clock_in = Some(now);
            record.status = AttendanceStatus::Live(LiveStatus::InProgress);
            store
                .save(&record)
                .await
                .map_err(|e| internal(e, employee_id, "clock-in"))?;
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Clocked in successfully"
            })))
        }
        None => {
            let mut record = AttendanceRecord::new(
                employee_id,
                now.date(),
                AttendanceStatus::Live(LiveStatus::InProgress),
            );
            record.clock_in = Some(now);
            store
                .create(record)
                .await
                .map_err(|e| internal(e, employee_id, "clock-in"))?;
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Clocked in successfully"
            })))
        }
    }
}

/// Clock-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/clock-out",
    request_body = ClockRequest,
    responses(
        (status = 200, description = "Clocked out successfully", body = Object, example = json!({
            "message": "Clocked out successfully"
        })),
        (status = 400, description = "No active clock-in found for today", body = Object, example = json!({
            "message": "No active clock-in found for today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    store: web::Data<SqlAttendanceStore>,
    payload: web::Json<ClockRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;
    let now = Local::now().naive_local();

    let existing = store
        .find(employee_id, now.date())
        .await
        .map_err(|e| internal(e, employee_id, "clock-out lookup"))?;

    let Some(mut record) = existing.filter(|r| r.has_open_clock_in() && !r.status.is_sealed())
    else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active clock-in found for today"
        })));
    };

    record.close_open_break(now);
    record.clock_out = Some(now);
    record.status = AttendanceStatus::Live(LiveStatus::Completed);
    store
        .save(&record)
        .await
        .map_err(|e| internal(e, employee_id, "clock-out"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Clocked out successfully"
    })))
}

/// Break start endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/break/start",
    request_body = ClockRequest,
    responses(
        (status = 200, description = "Break started", body = Object, example = json!({
            "message": "Break started"
        })),
        (status = 400, description = "Not clocked in or already on break", body = Object, example = json!({
            "message": "Not clocked in"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn break_start(
    store: web::Data<SqlAttendanceStore>,
    payload: web::Json<ClockRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;
    let now = Local::now().naive_local();

    let existing = store
        .find(employee_id, now.date())
        .await
        .map_err(|e| internal(e, employee_id, "break-start lookup"))?;

    let Some(mut record) = existing.filter(|r| r.has_open_clock_in() && !r.status.is_sealed())
    else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Not clocked in"
        })));
    };

    if record.status == AttendanceStatus::Live(LiveStatus::OnBreak) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Already on break"
        })));
    }

    record.break_sessions.push(BreakSession {
        break_in: now,
        break_out: None,
        duration_minutes: 0,
    });
    record.status = AttendanceStatus::Live(LiveStatus::OnBreak);
    store
        .save(&record)
        .await
        .map_err(|e| internal(e, employee_id, "break-start"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Break started"
    })))
}

/// Break end endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/break/end",
    request_body = ClockRequest,
    responses(
        (status = 200, description = "Break ended", body = Object, example = json!({
            "message": "Break ended"
        })),
        (status = 400, description = "No open break", body = Object, example = json!({
            "message": "No open break"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn break_end(
    store: web::Data<SqlAttendanceStore>,
    payload: web::Json<ClockRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;
    let now = Local::now().naive_local();

    let existing = store
        .find(employee_id, now.date())
        .await
        .map_err(|e| internal(e, employee_id, "break-end lookup"))?;

    let Some(mut record) =
        existing.filter(|r| r.status == AttendanceStatus::Live(LiveStatus::OnBreak))
    else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No open break"
        })));
    };

    record.close_open_break(now);
    record.status = AttendanceStatus::Live(LiveStatus::InProgress);
    store
        .save(&record)
        .await
        .map_err(|e| internal(e, employee_id, "break-end"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Break ended"
    })))
}
