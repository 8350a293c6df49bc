pub mod health;
pub mod providers;
