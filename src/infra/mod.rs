pub mod conversation;
pub mod email;
pub mod factory;
pub mod index;
pub mod push;
pub mod repositories;
