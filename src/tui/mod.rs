pub mod app;
pub mod dispatch;
pub mod editor;
pub mod filter;
pub mod graph;
pub mod input;
pub mod msg;
pub mod render;
pub mod theme;
pub mod tree;
pub mod wizard;

pub use app::run;
