//! Delivery adapter
//!
//! The only component that touches HTTP. [`DocumentDelivery`] turns a record
//! into response bytes; [`router`] exposes it over axum.

pub mod http;
pub mod response;
pub mod service;

pub use http::{router, status_for, AppState};
pub use response::{
    download_name, DeliveryMode, DeliveryResponse, Disposition, PDF_CONTENT_TYPE, PRINT_HEADER,
};
pub use service::DocumentDelivery;
