//! Plant commands - list, show, add, edit, sell, receive, remove, clear
//!
//! Data-oriented design: structs for data, functions for behavior.

use crate::cli::confirm::confirm_or_yes;
use crate::cli::error::HelpfulError;
use crate::cli::output::{format_price, print_record, print_table_colored, quantity_color};
use crate::cli::price::parse_price;
use crate::cli::stock::{self, StockChange, MAX_STOCK};
use clap::{Args, Subcommand};
use plantstock_db::{
    Address, Column, Direction, FieldSet, Filter, NewPlant, PlantRecord, PlantStore, Sort,
    Value,
};
use serde::Serialize;
use tracing::info;

/// Plant inventory commands
#[derive(Subcommand, Debug, Clone)]
pub enum PlantCommand {
    /// List plants, optionally filtered by name
    List {
        /// Only show plants whose name contains TERM (case-insensitive)
        #[arg(short, long, value_name = "TERM")]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show every field of one plant
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Add a new plant
    Add(AddArgs),
    /// Change fields of an existing plant
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditArgs,
    },
    /// Sell one unit (quantity - 1)
    Sell { id: String },
    /// Receive one unit from the supplier (quantity + 1)
    Receive { id: String },
    /// Delete one plant
    Rm {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every plant
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Fields for a new plant
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    /// Price, with '.' or ',' as decimal separator
    #[arg(long, value_parser = parse_price)]
    pub price: f64,
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=MAX_STOCK))]
    pub quantity: i64,
    #[arg(long)]
    pub supplier_name: String,
    #[arg(long)]
    pub supplier_email: String,
    #[arg(long)]
    pub supplier_phone: Option<String>,
    /// Image path or URI
    #[arg(long)]
    pub image: Option<String>,
}

/// Fields to change; omitted flags keep their stored value
#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// Price, with '.' or ',' as decimal separator
    #[arg(long, value_parser = parse_price)]
    pub price: Option<f64>,
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..=MAX_STOCK))]
    pub quantity: Option<i64>,
    #[arg(long)]
    pub supplier_name: Option<String>,
    #[arg(long)]
    pub supplier_email: Option<String>,
    /// Supplier phone; an empty value clears it
    #[arg(long)]
    pub supplier_phone: Option<String>,
    /// Image path or URI; an empty value clears it
    #[arg(long)]
    pub image: Option<String>,
}

impl From<AddArgs> for NewPlant {
    fn from(args: AddArgs) -> Self {
        NewPlant {
            name: args.name.trim().to_string(),
            price: args.price,
            quantity: args.quantity,
            image: non_empty(args.image),
            supplier_name: args.supplier_name.trim().to_string(),
            supplier_phone: non_empty(args.supplier_phone),
            supplier_email: args.supplier_email.trim().to_string(),
        }
    }
}

impl EditArgs {
    /// Partial field set for the flags that were given.
    pub fn to_fields(&self) -> FieldSet {
        let mut fields = FieldSet::new();
        if let Some(name) = &self.name {
            fields.insert(Column::Name, name.trim());
        }
        if let Some(price) = self.price {
            fields.insert(Column::Price, price);
        }
        if let Some(quantity) = self.quantity {
            fields.insert(Column::Quantity, quantity);
        }
        if let Some(name) = &self.supplier_name {
            fields.insert(Column::SupplierName, name.trim());
        }
        if let Some(email) = &self.supplier_email {
            fields.insert(Column::SupplierEmail, email.trim());
        }
        if let Some(phone) = &self.supplier_phone {
            fields.insert(Column::SupplierPhone, optional_text(phone));
        }
        if let Some(image) = &self.image {
            fields.insert(Column::Image, optional_text(image));
        }
        fields
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn optional_text(value: &str) -> Value {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::from(trimmed)
    }
}

/// Parse a plant ID argument
pub fn parse_id(input: &str) -> Result<i64, HelpfulError> {
    match input.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(HelpfulError::invalid_id(input)),
    }
}

/// One line of the catalog listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantSummary {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

const SUMMARY_COLUMNS: [Column; 4] = [Column::Id, Column::Name, Column::Price, Column::Quantity];

/// Execute a plant command
pub async fn run(store: &PlantStore, command: PlantCommand) -> anyhow::Result<()> {
    match command {
        PlantCommand::List { search, json } => list_plants(store, search.as_deref(), json).await,
        PlantCommand::Show { id, json } => show_plant(store, parse_id(&id)?, json).await,
        PlantCommand::Add(args) => add_plant(store, args).await.map(|_| ()),
        PlantCommand::Edit { id, fields } => edit_plant(store, parse_id(&id)?, &fields).await,
        PlantCommand::Sell { id } => stock::run(store, parse_id(&id)?, StockChange::Sell).await,
        PlantCommand::Receive { id } => {
            stock::run(store, parse_id(&id)?, StockChange::Receive).await
        }
        PlantCommand::Rm { id, yes } => remove_plant(store, parse_id(&id)?, yes).await,
        PlantCommand::Clear { yes } => clear_plants(store, yes).await,
    }
}

/// Fetch catalog lines, filtered by a name search term.
///
/// The term is bound as a parameter and matched literally.
pub async fn fetch_summaries(
    store: &PlantStore,
    search: Option<&str>,
) -> anyhow::Result<Vec<PlantSummary>> {
    let filter = search
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(Filter::name_contains);

    let rows = store
        .spawn_read(
            Address::Collection,
            Some(SUMMARY_COLUMNS.to_vec()),
            filter,
            Some(Sort::asc(Column::Name).then(Column::Id, Direction::Asc)),
        )
        .await?
        .map_err(HelpfulError::from)?;

    let summaries = rows
        .map(|row| PlantSummary {
            id: row.i64(Column::Id).unwrap_or_default(),
            name: row.text(Column::Name).unwrap_or_default().to_string(),
            price: row.f64(Column::Price).unwrap_or_default(),
            quantity: row.i64(Column::Quantity).unwrap_or_default(),
        })
        .collect();
    Ok(summaries)
}

async fn list_plants(store: &PlantStore, search: Option<&str>, json: bool) -> anyhow::Result<()> {
    let plants = fetch_summaries(store, search).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plants)?);
        return Ok(());
    }

    if plants.is_empty() {
        match search {
            Some(term) if !term.trim().is_empty() => {
                println!("No plants match '{}'.", term.trim());
            }
            _ => {
                println!("No plants in the inventory.");
                println!();
                println!("Add one with:");
                println!("  plantstock add --name Fern --price 4,50 --quantity 10 \\");
                println!("    --supplier-name 'Greenhouse Ltd' \\");
                println!("    --supplier-email orders@greenhouse.test");
            }
        }
        return Ok(());
    }

    let rows = plants
        .iter()
        .map(|p| {
            vec![
                (p.id.to_string(), None),
                (p.name.clone(), None),
                (format_price(p.price), None),
                (p.quantity.to_string(), quantity_color(p.quantity)),
            ]
        })
        .collect();
    print_table_colored(&["ID", "NAME", "PRICE", "QTY"], rows);
    println!("{} plant(s)", plants.len());
    Ok(())
}

/// Fetch one plant or fail with a not-found error.
pub async fn fetch_plant(store: &PlantStore, id: i64) -> anyhow::Result<PlantRecord> {
    let record = store
        .get(Address::Item(id))
        .await
        .map_err(HelpfulError::from)?
        .ok_or_else(|| HelpfulError::plant_not_found(id))?;
    Ok(record)
}

async fn show_plant(store: &PlantStore, id: i64, json: bool) -> anyhow::Result<()> {
    let record = fetch_plant(store, id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&record);
    }
    Ok(())
}

/// Create a plant and return its ID.
pub async fn add_plant(store: &PlantStore, args: AddArgs) -> anyhow::Result<i64> {
    let plant = NewPlant::from(args);
    let name = plant.name.clone();

    let address = store.create(plant).await.map_err(HelpfulError::from)?;
    let id = address
        .item_id()
        .ok_or_else(|| HelpfulError::new("Store returned a collection address for a new plant"))?;

    info!(id, "Plant added");
    println!("Added plant {}: {}", id, name);
    Ok(id)
}

/// Apply the given edits to one plant.
pub async fn edit_plant(store: &PlantStore, id: i64, edits: &EditArgs) -> anyhow::Result<()> {
    let fields = edits.to_fields();
    if fields.is_empty() {
        return Err(HelpfulError::new("Nothing to change")
            .with_context(format!("No field flags were given for plant {}", id))
            .with_suggestion("TRY: plantstock edit ID --price 5,00 --quantity 3")
            .into());
    }

    let updated = store
        .update(Address::Item(id), fields, None)
        .await
        .map_err(HelpfulError::from)?;
    if updated == 0 {
        return Err(HelpfulError::plant_not_found(id).into());
    }

    info!(id, "Plant updated");
    println!("Updated plant {}", id);
    Ok(())
}

/// Delete one plant after confirmation.
pub async fn remove_plant(store: &PlantStore, id: i64, yes: bool) -> anyhow::Result<()> {
    let record = fetch_plant(store, id).await?;

    if !confirm_or_yes(&format!("Delete plant {} ({})?", id, record.name), yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let removed = store
        .delete(Address::Item(id), None)
        .await
        .map_err(HelpfulError::from)?;
    if removed == 0 {
        return Err(HelpfulError::plant_not_found(id).into());
    }

    info!(id, "Plant deleted");
    println!("Deleted plant {}: {}", id, record.name);
    Ok(())
}

/// Delete every plant after confirmation.
pub async fn clear_plants(store: &PlantStore, yes: bool) -> anyhow::Result<()> {
    let count = store.db().count(None).await.map_err(HelpfulError::from)?;
    if count == 0 {
        println!("No plants to delete.");
        return Ok(());
    }

    let prompt = format!("Delete all {} plant(s)? This cannot be undone.", count);
    if !confirm_or_yes(&prompt, yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let removed = store
        .delete(Address::Collection, None)
        .await
        .map_err(HelpfulError::from)?;

    info!(removed, "Inventory cleared");
    println!("Deleted {} plant(s)", removed);
    Ok(())
}
