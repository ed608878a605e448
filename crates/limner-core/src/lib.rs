pub mod config;
pub mod date;
pub mod error;
pub mod evaluate;
pub mod feedback;
pub mod lookup;
pub mod normalize;
pub mod reveal;
pub mod session;
pub mod suggest;
pub mod types;

pub use config::GameConfig;
pub use error::{GameError, ValidationError};
pub use evaluate::{Evaluation, Evaluator};
pub use lookup::{ArtistLookup, MemoryLookup};
pub use types::*;
