pub mod common;
pub mod image;
pub mod input;
pub mod prompt;
pub mod result;
pub mod text;

pub use common::*;
pub use image::*;
pub use input::*;
pub use prompt::*;
pub use result::*;
pub use text::*;
