//! Sell and receive: single-unit stock adjustments.

use plantstock_db::{Address, Column, FieldSet, Filter, PlantStore};
use tracing::{debug, info};

use crate::cli::error::HelpfulError;

/// Highest stock quantity the CLI lets `receive` reach.
pub const MAX_STOCK: i64 = 9999;

/// Direction of a one-unit stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockChange {
    /// One unit leaves the shop.
    Sell,
    /// One unit arrives from the supplier.
    Receive,
}

/// Quantity after applying `change`, or why it cannot be applied.
pub fn next_quantity(current: i64, change: StockChange) -> Result<i64, HelpfulError> {
    match change {
        StockChange::Sell if current <= 0 => Err(HelpfulError::new("Out of stock")
            .with_context("Quantity is already 0")
            .with_suggestion("TRY: plantstock receive ID   # Restock first")),
        StockChange::Sell => Ok(current - 1),
        StockChange::Receive if current >= MAX_STOCK => {
            Err(HelpfulError::new(format!("Stock limit reached ({} units)", MAX_STOCK))
                .with_context(format!("Quantity is already {}", current)))
        }
        StockChange::Receive => Ok(current + 1),
    }
}

/// Rereads allowed when another writer changes the quantity first.
const MAX_ATTEMPTS: usize = 64;

/// Apply a one-unit change to a plant and return the new quantity.
///
/// The write only lands if the quantity is still the one that was read, so
/// concurrent sells and receives never overwrite each other.
pub async fn adjust(store: &PlantStore, id: i64, change: StockChange) -> anyhow::Result<i64> {
    for attempt in 1..=MAX_ATTEMPTS {
        let record = store
            .get(Address::Item(id))
            .await
            .map_err(HelpfulError::from)?
            .ok_or_else(|| HelpfulError::plant_not_found(id))?;

        let quantity = next_quantity(record.quantity, change)?;
        let unchanged = Filter::id(id).and(Filter::eq(Column::Quantity, record.quantity));
        let updated = store
            .update(
                Address::Collection,
                FieldSet::new().quantity(quantity),
                Some(&unchanged),
            )
            .await
            .map_err(HelpfulError::from)?;

        if updated > 0 {
            info!(id, ?change, quantity, "Stock adjusted");
            return Ok(quantity);
        }
        debug!(id, attempt, "Quantity changed underneath, retrying");
    }

    Err(HelpfulError::new(format!("Plant {} is being updated by another process", id))
        .with_context(format!("Stock changed {} times while adjusting", MAX_ATTEMPTS))
        .with_suggestion("TRY: Run the command again")
        .into())
}

/// Run `sell` or `receive` for one plant.
pub async fn run(store: &PlantStore, id: i64, change: StockChange) -> anyhow::Result<()> {
    let quantity = adjust(store, id, change).await?;
    let verb = match change {
        StockChange::Sell => "Sold",
        StockChange::Receive => "Received",
    };
    println!("{} 1 unit of plant {}. In stock: {}", verb, id, quantity);
    Ok(())
}
