pub mod canvas;
pub mod frame;
