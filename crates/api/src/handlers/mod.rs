pub mod admin;
pub mod child;
