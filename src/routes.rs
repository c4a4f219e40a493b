use crate::{
    api::{leave_catalog, leave_request, notification},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("non-zero period and burst size");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Every route is protected; identity comes from the bearer token.
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            .wrap(build_limiter(config.rate_protected_per_min))
            .service(
                web::scope("/leave_request")
                    // /leave_request
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave_request/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(leave_request::get_leave))
                            .route(web::put().to(leave_request::update_leave))
                            .route(web::delete().to(leave_request::delete_leave)),
                    ),
            )
            .service(
                web::scope("/leave_table")
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_catalog::list_leave_types))
                            .route(web::post().to(leave_catalog::create_leave_type)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(leave_catalog::update_leave_type))
                            .route(web::delete().to(leave_catalog::delete_leave_type)),
                    ),
            )
            .service(
                web::scope("/leave_assignment")
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_catalog::list_assignments))
                            .route(web::post().to(leave_catalog::create_assignment)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(leave_catalog::update_assignment))
                            .route(web::delete().to(leave_catalog::delete_assignment)),
                    ),
            )
            .service(
                web::scope("/notifications")
                    // /notifications
                    .service(
                        web::resource("")
                            .route(web::get().to(notification::list_notifications))
                            .route(web::post().to(notification::create_notification)),
                    )
                    .service(
                        web::resource("/unread/count")
                            .route(web::get().to(notification::unread_count)),
                    )
                    .service(
                        web::resource("/admin")
                            .route(web::get().to(notification::list_all_notifications)),
                    )
                    .service(
                        web::resource("/user/{employeeNumber}")
                            .route(web::get().to(notification::list_user_notifications)),
                    )
                    .service(
                        web::resource("/read-all").route(web::put().to(notification::mark_all_read)),
                    )
                    .service(
                        web::resource("/from-announcement")
                            .route(web::post().to(notification::from_announcement)),
                    )
                    .service(
                        web::resource("/from-leave").route(web::post().to(notification::from_leave)),
                    )
                    // /notifications/{id}/read
                    .service(
                        web::resource("/{id}/read").route(web::put().to(notification::mark_read)),
                    ),
            ),
    );
}
