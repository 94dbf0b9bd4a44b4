//! Rendering: paragraph segmentation and display surfaces.

pub mod headless;
pub mod paragraph;
pub mod surface;

pub use headless::HeadlessSurface;
pub use paragraph::{segment, Paragraph, Span};
pub use surface::{DisplaySurface, ViewportMetrics};
