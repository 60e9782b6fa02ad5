pub mod data;
pub mod io;

#[cfg(test)]
mod tests;

pub use data::Config;
pub use io::ConfigError;
