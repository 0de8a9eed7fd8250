pub mod backend;
pub mod visualization;
