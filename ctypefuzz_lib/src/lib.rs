pub mod declarator;
pub mod entropy;
pub mod fuzz;
pub mod generate;
pub mod settings;
pub mod ty;
