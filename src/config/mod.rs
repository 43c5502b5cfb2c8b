//! Runtime settings read from the environment, plus fixed constants
//! (cache prefixes, pool sizes, pricing defaults).

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
