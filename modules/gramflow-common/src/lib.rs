pub mod config;
pub mod error;
pub mod events;
pub mod json;

pub use config::Config;
pub use error::GramflowError;
pub use json::{pluck, pluck_bool, pluck_f64, pluck_i64, pluck_str, pluck_string_list};
