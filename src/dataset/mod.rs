pub mod assembler;
pub mod dataset;
pub mod metadata;
pub mod sample_model;
