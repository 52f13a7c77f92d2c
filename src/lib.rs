pub use utils::Pos;
mod utils;

pub use world::{SparseWorld, World};
pub mod world;

pub use life::{step, step_delta, StepDelta};
pub mod life;

pub use sim::{Frame, Sim, SimHandle};
mod sim;

pub use view::View;
mod view;

pub mod pattern;
