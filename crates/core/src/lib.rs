#![forbid(unsafe_code)]

pub mod cache;
pub mod guard;
pub mod model;
pub mod time;
pub mod validation;
pub mod wizard;

pub use time::Clock;
