//! `shepherd-core` — shared primitives for the dashboard core crates.
//!
//! No IO beyond reading configuration from the process environment.

pub mod config;
pub mod error;
pub mod id;

pub use config::{LogFormat, ShepherdConfig};
pub use error::{CoreError, CoreResult};
pub use id::ActorId;
