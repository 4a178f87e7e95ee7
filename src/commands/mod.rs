pub mod analyze;
pub mod embed;
pub mod generate;
pub mod select;
