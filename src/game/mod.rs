pub mod constants;
pub mod food;
pub mod grid;
pub mod input;
pub mod room;
pub mod spawn;
pub mod types;
