pub mod feed;
pub mod health;
pub mod provider;
