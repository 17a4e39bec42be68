//! Frame rendering and animation assembly for wind streamline maps.
//!
//! - [`colorscale`]: fixed viridis magnitude scale, clamped to its domain
//! - [`streamlines`]: deterministic streamline layout over a masked field
//! - [`frame`]: composition of one frame from the field and static layers
//! - [`animation`]: looping GIF output
//! - [`png`]: per-frame PNG export

pub mod animation;
pub mod canvas;
pub mod colorscale;
pub mod error;
pub mod frame;
pub mod layers;
pub mod png;
pub mod streamlines;
pub mod text;

pub use animation::{encode_gif, write_gif};
pub use canvas::FrameLayout;
pub use colorscale::{Color, ColorScale};
pub use error::{RenderError, RenderResult};
pub use frame::{render_frame, Frame, FrameContext, FrameStyle};
pub use streamlines::{trace_streamlines, Streamline, StreamlineConfig};
