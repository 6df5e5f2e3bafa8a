//! Template rendering
//!
//! - [`expand`](expand()) pads repeating rows to a layout's fixed minimum
//! - [`TemplateRegistry`] maps each form kind to its descriptor
//! - [`TemplateRenderer`] produces the editable artifact

pub mod expand;
pub mod registry;
pub mod renderer;

pub use expand::expand;
pub use registry::TemplateRegistry;
pub use renderer::{escape_xml, RenderStage, RenderedDocument, TemplateRenderer};
