pub mod camera;
pub mod canvas;
pub mod input;
pub mod render;
pub mod state;
