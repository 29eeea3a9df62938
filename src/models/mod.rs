//! Core data models for the pairing engine.

mod ids;
mod pairing;
mod player;
mod points;
mod round;
mod standings;
mod tournament;

pub use ids::*;
pub use pairing::*;
pub use player::*;
pub use points::*;
pub use round::*;
pub use standings::*;
pub use tournament::*;
