//! Products domain module.
//!
//! This crate contains the business rules for inventory line items,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;
pub mod value;

pub use product::{NewProduct, Product, ProductDraft, ProductPatch, ProductUpdate};
pub use value::{Price, ProductName, Quantity};
