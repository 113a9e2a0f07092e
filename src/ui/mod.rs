// Terminal surface: input translation, pointer shapes and the bar loop

pub mod events;
pub mod input;
pub mod line;
pub mod pointer;

pub use events::{BarEvent, run_bar, run_loop};
pub use line::BarLine;
pub use pointer::SetPointerShape;
