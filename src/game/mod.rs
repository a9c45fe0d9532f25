//! Game catalog

pub mod model;
pub mod service;

pub use model::{Game, GameDraft};
pub use service::GameService;
