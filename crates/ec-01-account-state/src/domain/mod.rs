pub mod cached_account;
pub mod config;
pub mod entities;
pub mod errors;
pub mod state;

pub use cached_account::*;
pub use config::*;
pub use entities::*;
pub use errors::*;
pub use state::*;
