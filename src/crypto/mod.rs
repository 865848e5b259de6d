//! Link-layer authentication, voice keystream generation, and message-indicator
//! evolution.

pub mod keystream;
pub mod lla;
pub mod mi;

pub use self::lla::{am1, am2, am3, am4};
pub use self::mi::evolve;
