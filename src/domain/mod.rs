pub mod article;
pub mod audit;
pub mod errors;
