pub mod errors;
pub mod openapi;
pub mod routes;
pub mod session;
pub mod startup;

pub use startup::{load_config, run};
