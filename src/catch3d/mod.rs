pub mod bounds;
pub mod collision;
pub mod scheduler;
pub mod scoring;
pub mod systems;
pub mod throw_control;
pub mod tween;
pub mod types;

pub use bounds::*;
pub use collision::{detect, ContactReport};
pub use scheduler::*;
pub use scoring::*;
pub use systems::*;
pub use throw_control::*;
pub use tween::*;
pub use types::*;
