pub mod allowance;
pub mod errors;
pub mod growth;
pub mod outcome;
pub mod params;

pub use allowance::*;
pub use errors::*;
pub use growth::*;
pub use outcome::*;
pub use params::*;
