pub mod blend;
pub mod compositor;
pub mod geometry;
pub mod surface;
