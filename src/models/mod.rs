pub mod image;
pub mod record;
pub mod request;

pub use image::*;
pub use record::*;
pub use request::*;
