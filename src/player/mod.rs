//! Player profiles

pub mod model;
pub mod service;

pub use model::{NewPlayer, Player, PlayerUpdate};
pub use service::PlayerService;
