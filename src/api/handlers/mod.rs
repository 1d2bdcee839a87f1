pub mod auth;
pub mod booking;
pub mod event;
pub mod health;
pub mod invite;
pub mod news;
pub mod search;
pub mod venue;
