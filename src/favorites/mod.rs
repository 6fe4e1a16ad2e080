pub mod movie;
pub mod store;

pub use movie::*;
pub use store::*;
