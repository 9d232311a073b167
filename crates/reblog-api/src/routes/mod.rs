pub mod channels;
pub mod health;
pub mod links;
pub mod messages;
pub mod reblogs;
pub mod stars;
