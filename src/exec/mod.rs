//! Command execution primitives layered over a [`Connector`](crate::connection::Connector)

pub mod error;
mod executor;

pub use error::ExecError;
pub use executor::Executor;
