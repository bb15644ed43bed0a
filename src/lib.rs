pub mod authentication;
pub mod configuration;
pub mod headers;
pub mod redirect;
pub mod routes;
pub mod session_state;
pub mod startup;
pub mod telemetry;
