//! Route configuration.
//!
//! Centralized route setup; each domain manages its own scope.

use actix_web::web;

use crate::handlers;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .configure(routes::events::configure)
            .configure(routes::employees::configure)
            .configure(routes::admin::configure),
    );
}

mod routes {
    use super::*;

    pub mod events {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/events")
                    .service(handlers::publish_personal)
                    .service(handlers::publish_position)
                    .service(handlers::publish_history)
                    .service(handlers::list_audit)
                    .service(handlers::list_dead_letters),
            );
        }
    }

    pub mod employees {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/employees")
                    .service(handlers::list_employees)
                    .service(handlers::get_employee)
                    .service(handlers::get_employee_history),
            );
        }
    }

    pub mod admin {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(web::scope("/admin").service(handlers::reset_state));
        }
    }
}
