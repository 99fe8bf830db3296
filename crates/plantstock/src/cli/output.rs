//! Output formatting utilities for CLI commands

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use plantstock_db::PlantRecord;

use crate::cli::stock::MAX_STOCK;

/// Format a price with two decimals.
///
/// Examples:
/// - 4.5 -> "4.50"
/// - 12.0 -> "12.00"
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// Color for a stock quantity: red when sold out, yellow at the cap.
pub fn quantity_color(quantity: i64) -> Option<Color> {
    if quantity <= 0 {
        Some(Color::Red)
    } else if quantity >= MAX_STOCK {
        Some(Color::Yellow)
    } else {
        None
    }
}

/// Print a table with headers and rows
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(|text| (text, None)).collect())
        .collect();
    print_table_colored(headers, rows);
}

/// Print a table with custom column colors
pub fn print_table_colored(headers: &[&str], rows: Vec<Vec<(String, Option<Color>)>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        let cells: Vec<Cell> = row
            .into_iter()
            .map(|(text, color)| {
                let cell = Cell::new(text);
                if let Some(c) = color {
                    cell.fg(c)
                } else {
                    cell
                }
            })
            .collect();
        table.add_row(cells);
    }

    println!("{}", table);
}

/// Print every field of one plant as a two-column table.
pub fn print_record(record: &PlantRecord) {
    let dash = || "-".to_string();
    print_table(
        &["FIELD", "VALUE"],
        vec![
            vec!["ID".to_string(), record.id.to_string()],
            vec!["Name".to_string(), record.name.clone()],
            vec!["Price".to_string(), format_price(record.price)],
            vec!["Quantity".to_string(), record.quantity.to_string()],
            vec!["Image".to_string(), record.image.clone().unwrap_or_else(dash)],
            vec!["Supplier".to_string(), record.supplier_name.clone()],
            vec![
                "Supplier phone".to_string(),
                record.supplier_phone.clone().unwrap_or_else(dash),
            ],
            vec!["Supplier email".to_string(), record.supplier_email.clone()],
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(4.5), "4.50");
        assert_eq!(format_price(0.0), "0.00");
        assert_eq!(format_price(12.345), "12.35");
        assert_eq!(format_price(1999.999), "2000.00");
    }

    #[test]
    fn test_quantity_color() {
        assert_eq!(quantity_color(0), Some(Color::Red));
        assert_eq!(quantity_color(5), None);
        assert_eq!(quantity_color(MAX_STOCK), Some(Color::Yellow));
    }
}
