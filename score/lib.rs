#![deny(unused_variables)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(clippy::no_effect_underscore_binding)]
pub mod aggregate;
pub mod ams;
pub mod config;
pub mod io;
pub mod pipeline;
pub mod solution;
pub mod types;
pub mod validate;

pub use config::ScoringConfig;
pub use pipeline::run;
pub use types::{ScoreError, ScoreReport};
