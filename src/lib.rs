pub mod browser;
pub mod capture;
pub mod config;
pub mod error;
pub mod page;

pub use browser::Renderer;
pub use capture::ImageFormat;
pub use config::{RendererBuilder, RendererConfig};
pub use error::{Error, Result};
pub use page::Page;
