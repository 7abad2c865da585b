use crate::api::attendance::ClockRequest;
use crate::api::finalize::FinalizeRequest;
use crate::finalize::stats::{FinalizeOutcome, FinalizeStats};
use crate::model::attendance::{AttendanceRecord, BreakSession, FinalStatus, LiveStatus};
use crate::model::employee::Employee;
use crate::model::shift::{Shift, ShiftAssignment};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance tracking & finalization

This API powers the attendance subsystem of an HRM service.

### 🔹 Key Features
- **Live clock actions**
  - Daily clock-in / clock-out and break tracking per employee
- **Attendance finalization**
  - A recurring job converts the day's activity into an authoritative
    final record per employee: present, half-day, absent, leave or
    incomplete. Shift-aware (including overnight shifts), idempotent,
    and holiday/weekend gated
- **Manual triggers**
  - Finalize a whole day (with backfill) or a single employee for
    administrative corrections

### 📦 Response Format
- JSON-based RESTful responses

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::break_start,
        crate::api::attendance::break_end,

        crate::api::finalize::finalize_day,
        crate::api::finalize::finalize_employee
    ),
    components(
        schemas(
            ClockRequest,
            FinalizeRequest,
            FinalizeStats,
            FinalizeOutcome,
            AttendanceRecord,
            BreakSession,
            LiveStatus,
            FinalStatus,
            Employee,
            Shift,
            ShiftAssignment
        )
    ),
    tags(
        (name = "Attendance", description = "Live clock-in/out and break APIs"),
        (name = "Finalization", description = "Attendance finalization triggers"),
    )
)]
pub struct ApiDoc;
