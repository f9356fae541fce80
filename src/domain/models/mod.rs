pub mod role;
pub mod tenant;
pub mod user;
