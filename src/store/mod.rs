//! Storage backends behind the sync seams.

#[cfg(feature = "http")]
pub mod http;
#[cfg(all(feature = "http", feature = "sqlite"))]
pub mod probe;
#[cfg(feature = "sqlite")]
pub mod sqlite;
