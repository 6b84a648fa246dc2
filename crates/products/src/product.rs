use rust_decimal::Decimal;
use serde::Serialize;

use parlor_core::{CategoryId, DomainResult, Entity, ProductId};

use crate::value::{Price, ProductName, Quantity};

/// Entity: one inventory line item as persisted by the store.
///
/// A `Product` always has a store-assigned id. Values that have not been
/// persisted yet are represented by [`NewProduct`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: ProductId,
    name: ProductName,
    category_id: CategoryId,
    price: Price,
    quantity: Quantity,
}

impl Product {
    /// Rebuild a product from raw stored columns, re-checking every invariant.
    pub fn restore(
        id: ProductId,
        name: &str,
        category_id: CategoryId,
        price: Decimal,
        quantity: i64,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: ProductName::new(name)?,
            category_id,
            price: Price::new(price)?,
            quantity: Quantity::new(quantity)?,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// `quantity * price` for this line, exact to the cent. Bounded by
    /// `Price::max() * Quantity::MAX`, so it cannot overflow.
    pub fn stock_value(&self) -> Decimal {
        self.price
            .amount()
            .checked_mul(Decimal::from(self.quantity.get()))
            .unwrap_or(Decimal::MAX)
    }

    pub fn set_name(&mut self, name: &str) -> DomainResult<()> {
        self.name = ProductName::new(name)?;
        Ok(())
    }

    pub fn set_category_id(&mut self, category_id: CategoryId) {
        self.category_id = category_id;
    }

    pub fn set_price(&mut self, price: Decimal) -> DomainResult<()> {
        self.price = Price::new(price)?;
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: i64) -> DomainResult<()> {
        self.quantity = Quantity::new(quantity)?;
        Ok(())
    }

    /// Apply an already-validated patch. Omitted fields stay as they are.
    pub fn apply_patch(&mut self, patch: &ProductPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
    }

    /// Validate `update` as a whole and apply it. Nothing changes on error.
    pub fn update(&mut self, update: ProductUpdate) -> DomainResult<()> {
        let patch = update.validate()?;
        self.apply_patch(&patch);
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Raw, unvalidated input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub category_id: CategoryId,
    pub price: Decimal,
    pub quantity: i64,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, category_id: CategoryId, price: Decimal, quantity: i64) -> Self {
        Self {
            name: name.into(),
            category_id,
            price,
            quantity,
        }
    }

    pub fn validate(self) -> DomainResult<NewProduct> {
        Ok(NewProduct {
            name: ProductName::new(&self.name)?,
            category_id: self.category_id,
            price: Price::new(self.price)?,
            quantity: Quantity::new(self.quantity)?,
        })
    }
}

/// A validated product that has no id yet. Only the store turns it into a
/// [`Product`], by assigning the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: ProductName,
    pub category_id: CategoryId,
    pub price: Price,
    pub quantity: Quantity,
}

impl NewProduct {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            category_id: self.category_id,
            price: self.price,
            quantity: self.quantity,
        }
    }
}

/// Raw, unvalidated partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub category_id: Option<CategoryId>,
    pub price: Option<Decimal>,
    pub quantity: Option<i64>,
}

impl ProductUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category_id(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Validate every provided field. The first invalid field fails the whole
    /// update, so a patch is either entirely valid or never produced.
    pub fn validate(self) -> DomainResult<ProductPatch> {
        Ok(ProductPatch {
            name: self.name.as_deref().map(ProductName::new).transpose()?,
            category_id: self.category_id,
            price: self.price.map(Price::new).transpose()?,
            quantity: self.quantity.map(Quantity::new).transpose()?,
        })
    }
}

/// A validated partial update, ready to be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<ProductName>,
    pub category_id: Option<CategoryId>,
    pub price: Option<Price>,
    pub quantity: Option<Quantity>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category_id.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }
}
