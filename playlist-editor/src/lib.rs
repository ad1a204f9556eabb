mod config;
mod session;
pub use config::*;
pub use session::*;
pub mod errors;
