pub mod naming;
pub mod table;
