pub mod booking;
pub mod capacity;
pub mod event;
pub mod geo;
pub mod invite;
pub mod news;
pub mod user;
pub mod venue;
