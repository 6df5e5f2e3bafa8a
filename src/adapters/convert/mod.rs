//! Editable → fixed-layout format conversion
//!
//! - [`RemoteConverter`] - external conversion service over HTTPS
//! - [`LocalConverter`] - in-process text-layout PDF writer
//! - [`create_converter`] - strategy selection from configuration
//! - [`verify_output`] - mandatory post-condition on every conversion

pub mod converter;
pub mod factory;
pub mod local;
pub mod pdf;
pub mod remote;

pub use converter::{verify_output, DocumentConverter};
pub use factory::create_converter;
pub use local::LocalConverter;
pub use remote::{RemoteConverter, FODT_MEDIA_TYPE};
