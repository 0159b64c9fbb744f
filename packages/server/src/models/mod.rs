pub mod auth;
pub mod contestant;
pub mod result;
pub mod round;
pub mod shared;
pub mod user;
pub mod vote;
