//! CLI module for PlantStock
//!
//! Every command goes through the record store in `plantstock_db`; nothing
//! here touches SQL or enforces a data invariant the store relies on.

pub mod config;
pub mod confirm;
pub mod error;
pub mod output;
pub mod plant;
pub mod price;
pub mod stock;
