pub mod repository;

pub use repository::{TaskRepository, UserRepository};
