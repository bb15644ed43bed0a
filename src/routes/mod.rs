mod health_check;
mod logout;

pub use health_check::health_check;
pub use logout::{error_chain_fmt, log_out, LogoutError, LogoutForm};
