pub mod archive;
pub mod live;
mod render;

pub use render::render_item;
