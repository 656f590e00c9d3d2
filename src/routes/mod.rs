// Route exports
pub mod analysis;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(analysis::health_check))
        .service(web::scope("/api").configure(analysis::configure));
}
