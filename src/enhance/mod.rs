//! Result enrichment: attaches company and resource names to records.
//!
//! [`Enhancer`] takes any operation result, finds the records inside it
//! ([`shape`]), resolves `companyID` / `assignedResourceID` through a
//! [`NameLookup`](crate::mapping::NameLookup) and writes the names under
//! `_enhanced`. Only the first [`MAX_ENHANCE_ITEMS`] records are looked up.

mod pipeline;
pub mod shape;

pub use pipeline::{Enhancer, Enrichment, MAX_ENHANCE_ITEMS};
