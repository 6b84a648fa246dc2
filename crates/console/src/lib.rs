//! Interactive text menu over the inventory.

pub mod menu;

pub use menu::{format_product, Console};
