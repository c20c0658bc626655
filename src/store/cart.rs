//! Cart store: purely local state, no server synchronization.

use crate::models::Product;

/// One line in the cart: a product at a chosen variant.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: String,
    pub product_id: String,
    pub title: String,
    pub unit_price: f64,
    pub variant: String,
    pub quantity: u32,
}

#[derive(Debug, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn total(&self) -> f64 {
        self.lines
            .iter()
            .map(|l| l.unit_price * f64::from(l.quantity))
            .sum()
    }

    /// Add a product at a chosen variant. An existing line for the same
    /// product and variant absorbs the quantity; otherwise a new line is
    /// appended. Returns the affected line's id.
    pub fn add(&mut self, product: &Product, variant: &str, quantity: u32) -> String {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id && l.variant == variant)
        {
            line.quantity += quantity;
            return line.id.clone();
        }

        let unit_price = product
            .variants
            .iter()
            .find(|v| v.ram == variant)
            .map(|v| v.price)
            .or_else(|| product.display_price())
            .unwrap_or(0.0);

        let line = CartLine {
            id: uuid::Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            title: product.title.clone(),
            unit_price,
            variant: variant.to_string(),
            quantity,
        };
        let id = line.id.clone();
        self.lines.push(line);
        id
    }

    pub fn remove(&mut self, line_id: &str) {
        self.lines.retain(|l| l.id != line_id);
    }

    /// Set a line's quantity; zero removes the line.
    pub fn set_quantity(&mut self, line_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(line_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == line_id) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
