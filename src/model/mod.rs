pub mod config;
pub mod item;
pub mod template;

pub use config::*;
pub use item::*;
pub use template::*;
