pub mod aggregate;

pub use aggregate::{CreateUserDto, User, UserId};
