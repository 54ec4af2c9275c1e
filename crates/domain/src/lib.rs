#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;

mod builder;
mod classifier;
mod clock;
mod error;
mod exercise;
mod fallback;
mod gateway;
mod name;
mod registry;
mod resolver;
mod service;
mod statistics;
mod workout;

pub use builder::*;
pub use classifier::*;
pub use clock::*;
pub use error::*;
pub use exercise::*;
pub use fallback::*;
pub use gateway::*;
pub use name::*;
pub use registry::*;
pub use resolver::*;
pub use service::*;
pub use statistics::*;
pub use workout::*;

#[cfg(test)]
mod tests {
    pub mod data;
}
