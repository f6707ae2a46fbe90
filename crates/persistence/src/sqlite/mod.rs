//! SQLite database management

mod claims;
mod connection;
mod ledger;

pub use claims::*;
pub use connection::Database;
pub use ledger::*;
