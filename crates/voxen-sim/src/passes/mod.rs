pub mod dirty;
pub mod lifecycle;
pub mod movement;
