//! Browse a folder of images and clip fixed-size regions out of them.
//!
//! A red outline the size of the output image follows the mouse over the
//! current picture. Clicking saves that region, cut from the full-resolution
//! original and resized to exactly the configured size, into the working
//! directory. Arrow keys move between images and the mouse wheel zooms.

pub mod app;
pub mod config;
pub mod crop;
pub mod error;
pub mod mapper;
pub mod session;
pub mod store;
pub mod view;

pub use config::{CropConfig, OutputFormat};
pub use error::{CropperError, Result};
pub use session::{InputEvent, Outcome, Session};
pub use store::ImageStore;
