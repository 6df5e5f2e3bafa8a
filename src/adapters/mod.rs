//! Adapters to the outside world
//!
//! - [`convert`] - editable → fixed-layout conversion (remote service or local writer)
//! - [`delivery`] - response building and the HTTP surface
//! - [`records`] - lookup of already-validated encounter records

pub mod convert;
pub mod delivery;
pub mod records;
