use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use parlor_core::{CategoryId, DomainError, DomainResult, ProductId};
use parlor_products::{ProductDraft, ProductUpdate};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// Form body shared by create and update. Every field arrives as text; an
/// empty field counts as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub q: Option<String>,
}

impl ListQuery {
    /// The search pattern, if one was given.
    pub fn pattern(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

impl ProductForm {
    /// All four fields are required.
    pub fn into_draft(self) -> DomainResult<ProductDraft> {
        let name = present(self.name).ok_or_else(|| required("name"))?;
        let category_id = present(self.category_id).ok_or_else(|| required("category_id"))?;
        let price = present(self.price).ok_or_else(|| required("price"))?;
        let quantity = present(self.quantity).ok_or_else(|| required("quantity"))?;

        Ok(ProductDraft::new(
            name,
            CategoryId::new(parse_field(&category_id, "category_id")?),
            parse_field::<Decimal>(&price, "price")?,
            parse_field(&quantity, "quantity")?,
        ))
    }

    /// Only the provided fields end up in the update.
    pub fn into_update(self) -> DomainResult<ProductUpdate> {
        Ok(ProductUpdate {
            name: present(self.name),
            category_id: present(self.category_id)
                .map(|v| parse_field(&v, "category_id").map(CategoryId::new))
                .transpose()?,
            price: present(self.price)
                .map(|v| parse_field::<Decimal>(&v, "price"))
                .transpose()?,
            quantity: present(self.quantity)
                .map(|v| parse_field(&v, "quantity"))
                .transpose()?,
        })
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

fn required(field: &str) -> DomainError {
    DomainError::validation(format!("{field} is required"))
}

fn parse_field<T>(raw: &str, field: &str) -> DomainResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| DomainError::validation(format!("{field} {raw:?} is not valid: {e}")))
}

// -------------------------
// Path helpers
// -------------------------

pub fn parse_product_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    raw.parse::<ProductId>().map_err(errors::domain_error_to_response)
}
