use crate::{
    api::{attendance, finalize},
    config::Config,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/attendance")
                // /attendance/clock-in, /attendance/clock-out
                .service(web::resource("/clock-in").route(web::post().to(attendance::clock_in)))
                .service(web::resource("/clock-out").route(web::post().to(attendance::clock_out)))
                // /attendance/break/start, /attendance/break/end
                .service(
                    web::scope("/break")
                        .service(
                            web::resource("/start").route(web::post().to(attendance::break_start)),
                        )
                        .service(
                            web::resource("/end").route(web::post().to(attendance::break_end)),
                        ),
                )
                // /attendance/finalize, /attendance/finalize/{employee_id}
                .service(web::resource("/finalize").route(web::post().to(finalize::finalize_day)))
                .service(
                    web::resource("/finalize/{employee_id}")
                        .route(web::post().to(finalize::finalize_employee)),
                ),
        ),
    );
}
