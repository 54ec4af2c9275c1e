#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod provider;
mod remote;
mod send;

pub use provider::*;
pub use remote::*;
pub use send::*;
