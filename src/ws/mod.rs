pub mod handler;
pub mod routes;
pub mod session;
pub mod utils;

pub use routes::create_ws_routes;
