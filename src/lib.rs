#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

pub mod address;
pub mod aggregate;
pub mod asname;
pub mod builder;
pub mod context;
pub mod error;
pub mod overlap;
pub mod routes;
pub mod table;
