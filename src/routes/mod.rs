// Route exports
pub mod space_objects;

pub use space_objects::AppState;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(space_objects::configure);
}
