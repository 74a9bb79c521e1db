pub mod entities;

pub use entities::{Gender, Level};
