//! Data module - CSV loading, cleaning and queries

mod cleaner;
mod loader;
pub mod query;
mod session;

pub use query::QueryError;
pub use session::{Session, SessionError};
