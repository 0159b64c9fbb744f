pub mod contestant;
pub mod role;
pub mod role_permission;
pub mod round;
pub mod user;
pub mod vote;
