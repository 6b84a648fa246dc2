//! Line-oriented console menu.
//!
//! The console reads one answer per line and never aborts on bad input:
//! malformed numbers and store errors are reported and the menu is shown
//! again. End of input at any prompt exits the loop.

use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use parlor_core::{CategoryId, Entity, ProductId};
use parlor_infra::{Inventory, RepositoryError};
use parlor_products::{Product, ProductDraft, ProductUpdate};

const MENU: &str = "\
==== Ice Cream Parlor Inventory ====
1. List products
2. Add product
3. Delete product
4. Update product
5. Search by name
6. Reload from store
7. Totals
0. Exit";

/// One-line rendering used by list and search output.
pub fn format_product(product: &Product) -> String {
    format!(
        "[{}] {} | Cat: {} | Price: {} | Stock: {}",
        product.id(),
        product.name(),
        product.category_id(),
        product.price(),
        product.quantity()
    )
}

enum Flow {
    Continue,
    Exit,
}

/// Outcome of reading and parsing one answer.
enum Answer<T> {
    Value(T),
    Invalid,
    Eof,
}

pub struct Console<R, W> {
    inventory: Arc<Inventory>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(inventory: Arc<Inventory>, input: R, output: W) -> Self {
        Self {
            inventory,
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the menu until the user picks `0` or input ends.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            writeln!(self.output, "\n{MENU}")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                break;
            };

            let flow = match choice.as_str() {
                "1" => self.list()?,
                "2" => self.add().await?,
                "3" => self.delete().await?,
                "4" => self.update().await?,
                "5" => self.search().await?,
                "6" => self.reload().await?,
                "7" => self.totals()?,
                "0" => Flow::Exit,
                other => {
                    writeln!(self.output, "Unknown option: {other}")?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                break;
            }
        }

        writeln!(self.output, "Goodbye.")?;
        self.output.flush()?;
        Ok(())
    }

    /// Print `label`, read one line and return it trimmed. `None` on EOF.
    fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_parsed<T>(&mut self, label: &str, what: &str) -> anyhow::Result<Answer<T>>
    where
        T: FromStr,
    {
        match self.prompt(label)? {
            None => Ok(Answer::Eof),
            Some(raw) => match raw.parse::<T>() {
                Ok(value) => Ok(Answer::Value(value)),
                Err(_) => {
                    writeln!(self.output, "Invalid {what}: {raw:?}")?;
                    Ok(Answer::Invalid)
                }
            },
        }
    }

    /// Like [`Self::prompt_parsed`], but an empty line means "keep".
    fn prompt_optional<T>(&mut self, label: &str, what: &str) -> anyhow::Result<Answer<Option<T>>>
    where
        T: FromStr,
    {
        match self.prompt(label)? {
            None => Ok(Answer::Eof),
            Some(raw) if raw.is_empty() => Ok(Answer::Value(None)),
            Some(raw) => match raw.parse::<T>() {
                Ok(value) => Ok(Answer::Value(Some(value))),
                Err(_) => {
                    writeln!(self.output, "Invalid {what}: {raw:?}")?;
                    Ok(Answer::Invalid)
                }
            },
        }
    }

    fn report(&mut self, err: RepositoryError) -> anyhow::Result<()> {
        if matches!(err, RepositoryError::Persistence(_)) {
            tracing::warn!(error = %err, "console action failed");
        }
        writeln!(self.output, "Error: {err}")?;
        Ok(())
    }

    fn list(&mut self) -> anyhow::Result<Flow> {
        let products = self.inventory.products();
        if products.is_empty() {
            writeln!(self.output, "No products in inventory.")?;
        }
        for product in &products {
            writeln!(self.output, "{}", format_product(product))?;
        }
        Ok(Flow::Continue)
    }

    async fn add(&mut self) -> anyhow::Result<Flow> {
        let Some(name) = self.prompt("Name: ")? else {
            return Ok(Flow::Exit);
        };
        let category_id = match self.prompt_parsed::<i64>("Category id: ", "category id")? {
            Answer::Value(v) => CategoryId::new(v),
            Answer::Invalid => return Ok(Flow::Continue),
            Answer::Eof => return Ok(Flow::Exit),
        };
        let price = match self.prompt_parsed::<Decimal>("Price: ", "price")? {
            Answer::Value(v) => v,
            Answer::Invalid => return Ok(Flow::Continue),
            Answer::Eof => return Ok(Flow::Exit),
        };
        let quantity = match self.prompt_parsed::<i64>("Quantity: ", "quantity")? {
            Answer::Value(v) => v,
            Answer::Invalid => return Ok(Flow::Continue),
            Answer::Eof => return Ok(Flow::Exit),
        };

        match self
            .inventory
            .add_product(ProductDraft::new(name, category_id, price, quantity))
            .await
        {
            Ok(product) => writeln!(self.output, "Added {}", format_product(&product))?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    async fn delete(&mut self) -> anyhow::Result<Flow> {
        let id = match self.prompt_parsed::<ProductId>("Product id: ", "product id")? {
            Answer::Value(id) => id,
            Answer::Invalid => return Ok(Flow::Continue),
            Answer::Eof => return Ok(Flow::Exit),
        };

        match self.inventory.remove_product(id).await {
            Ok(true) => writeln!(self.output, "Deleted product {id}.")?,
            Ok(false) => writeln!(self.output, "No product with id {id}.")?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    async fn update(&mut self) -> anyhow::Result<Flow> {
        let id = match self.prompt_parsed::<ProductId>("Product id: ", "product id")? {
            Answer::Value(id) => id,
            Answer::Invalid => return Ok(Flow::Continue),
            Answer::Eof => return Ok(Flow::Exit),
        };
        if let Some(current) = self.inventory.product(id) {
            writeln!(self.output, "Editing {}", format_product(&current))?;
        }
        writeln!(self.output, "Press Enter to keep a field unchanged.")?;

        let mut update = ProductUpdate::default();

        match self.prompt("New name: ")? {
            None => return Ok(Flow::Exit),
            Some(name) if name.is_empty() => {}
            Some(name) => update = update.name(name),
        }
        match self.prompt_optional::<i64>("New category id: ", "category id")? {
            Answer::Value(v) => update.category_id = v.map(CategoryId::new),
            Answer::Invalid => return Ok(Flow::Continue),
            Answer::Eof => return Ok(Flow::Exit),
        }
        match self.prompt_optional::<Decimal>("New price: ", "price")? {
            Answer::Value(v) => update.price = v,
            Answer::Invalid => return Ok(Flow::Continue),
            Answer::Eof => return Ok(Flow::Exit),
        }
        match self.prompt_optional::<i64>("New quantity: ", "quantity")? {
            Answer::Value(v) => update.quantity = v,
            Answer::Invalid => return Ok(Flow::Continue),
            Answer::Eof => return Ok(Flow::Exit),
        }

        match self.inventory.update_product(id, update).await {
            Ok(Some(product)) => writeln!(self.output, "Updated {}", format_product(&product))?,
            Ok(None) => writeln!(self.output, "No product with id {id}.")?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    async fn search(&mut self) -> anyhow::Result<Flow> {
        let Some(pattern) = self.prompt("Name contains: ")? else {
            return Ok(Flow::Exit);
        };

        match self.inventory.search_store(&pattern).await {
            Ok(found) if found.is_empty() => writeln!(self.output, "No matches.")?,
            Ok(found) => {
                for product in &found {
                    writeln!(self.output, "{}", format_product(product))?;
                }
            }
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    async fn reload(&mut self) -> anyhow::Result<Flow> {
        match self.inventory.reload().await {
            Ok(count) => writeln!(self.output, "Reloaded {count} products.")?,
            Err(e) => self.report(e)?,
        }
        Ok(Flow::Continue)
    }

    fn totals(&mut self) -> anyhow::Result<Flow> {
        let summary = self.inventory.summary();
        writeln!(self.output, "Products: {}", summary.product_count)?;
        writeln!(self.output, "Total items: {}", summary.total_items)?;
        writeln!(self.output, "Inventory value: {}", summary.inventory_value)?;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use parlor_infra::InMemoryProductRepository;

    use super::*;

    async fn run_script(inventory: Arc<Inventory>, script: &str) -> String {
        let mut console = Console::new(inventory, Cursor::new(script.to_string()), Vec::new());
        console.run().await.unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    async fn inventory() -> Arc<Inventory> {
        Arc::new(
            Inventory::open(Arc::new(InMemoryProductRepository::new()))
                .await
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn add_then_list_shows_product_line() {
        let inventory = inventory().await;
        let out = run_script(inventory.clone(), "2\nVanilla\n1\n3\n10\n1\n0\n").await;

        assert!(out.contains("Added [1] Vanilla | Cat: 1 | Price: 3.00 | Stock: 10"));
        assert!(out.contains("\n[1] Vanilla | Cat: 1 | Price: 3.00 | Stock: 10\n"));
        assert!(out.ends_with("Goodbye.\n"));
        assert_eq!(inventory.total_items(), 10);
    }

    #[tokio::test]
    async fn malformed_number_returns_to_menu() {
        let inventory = inventory().await;
        let out = run_script(inventory.clone(), "2\nVanilla\n1\nabc\n7\n0\n").await;

        assert!(out.contains("Invalid price: \"abc\""));
        assert!(out.contains("Total items: 0"));
        assert!(inventory.products().is_empty());
    }

    #[tokio::test]
    async fn validation_errors_are_printed_and_loop_continues() {
        let inventory = inventory().await;
        let out = run_script(inventory, "2\nVanilla\n1\n-2\n1\n0\n").await;

        assert!(out.contains("Error: validation failed: price cannot be negative"));
        assert!(out.contains("No products in inventory."));
    }

    #[tokio::test]
    async fn update_skips_empty_fields() {
        let inventory = inventory().await;
        let script = "2\nVanilla\n1\n3\n10\n4\n1\n\n\n3.50\n\n7\n0\n";
        let out = run_script(inventory.clone(), script).await;

        assert!(out.contains("Updated [1] Vanilla | Cat: 1 | Price: 3.50 | Stock: 10"));
        assert!(out.contains("Inventory value: 35.00"));
    }

    #[tokio::test]
    async fn delete_reports_missing_id() {
        let inventory = inventory().await;
        let out = run_script(inventory, "3\n42\n3\nxyz\n0\n").await;

        assert!(out.contains("No product with id 42."));
        assert!(out.contains("Invalid product id: \"xyz\""));
    }

    #[tokio::test]
    async fn search_matches_substring() {
        let inventory = inventory().await;
        let script = "2\nChocolate\n1\n2.50\n3\n2\nVanilla\n1\n3\n10\n5\ncho\n5\nzzz\n0\n";
        let out = run_script(inventory, script).await;

        assert!(out.contains("[1] Chocolate | Cat: 1 | Price: 2.50 | Stock: 3"));
        assert!(out.contains("No matches."));
    }

    #[tokio::test]
    async fn end_of_input_exits_cleanly() {
        let inventory = inventory().await;
        let out = run_script(inventory, "2\nVanilla\n").await;
        assert!(out.ends_with("Goodbye.\n"));

        let out = run_script(self::inventory().await, "").await;
        assert!(out.ends_with("Goodbye.\n"));
    }

    #[tokio::test]
    async fn unknown_option_is_reported() {
        let out = run_script(inventory().await, "9\n0\n").await;
        assert!(out.contains("Unknown option: 9"));
    }

    #[tokio::test]
    async fn reload_reports_count() {
        let inventory = inventory().await;
        let out = run_script(inventory, "2\nMint\n1\n1\n1\n6\n0\n").await;
        assert!(out.contains("Reloaded 1 products."));
    }
}
