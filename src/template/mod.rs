pub mod engine;

pub use engine::{find_unused, render, slug};
