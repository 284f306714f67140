mod geom;
mod instant;
mod landmarks;
mod output;
mod settings;
mod slot;

pub use geom::*;
pub use instant::MatchInstant;
pub use landmarks::*;
pub use output::*;
pub use settings::*;
pub use slot::*;

pub type Vector2 = nalgebra::Vector2<f64>;
