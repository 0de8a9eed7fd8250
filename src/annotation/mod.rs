pub mod element_model;
pub mod flatten;
pub mod normalize;
