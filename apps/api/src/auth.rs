mod password;
mod session;

pub use password::change_password_handler;
pub use session::{login_handler, logout_handler, me_handler};

pub const SESSION_PRINCIPAL_KEY: &str = "principal";
