use crate::routes;
use actix_web::web;

pub fn cleanup_routes(cfg: &mut web::ServiceConfig) {
    // Semantically a delete of every duplicate row; no body, no parameters.
    cfg.route("/cleanup", web::delete().to(routes::remove_all_duplicates));
}
