mod expire;
mod render;
mod types;

pub use expire::*;
pub use render::*;
pub use types::*;
