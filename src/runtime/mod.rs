//! Runtime orchestration: the engine and the state it owns.

pub mod blink;
pub mod engine;
pub mod registry;
pub mod scroll_memory;
pub mod timer;
pub mod viewport;
pub mod wheel;

pub use engine::{PreviewEngine, RenderReport};
pub use registry::{ActivePreview, PreviewLease};
