mod channel;
mod engine;
mod input;
mod store;
mod surface;
#[cfg(target_arch = "wasm32")]
mod web;

pub use channel::{ChannelError, Offline, SyncChannel};
pub use engine::{EngineConfig, SyncEngine};
pub use input::{DrawMode, InputCapture, PointerId, StrokeCommand, SurfaceBounds};
pub use store::{StrokeRef, StrokeStore};
pub use surface::{CompositeOperation, RenderSurface, RenderedStroke};
#[cfg(target_arch = "wasm32")]
pub use web::run;
