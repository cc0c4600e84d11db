pub mod articles;
pub mod revalidate;
