//! Schema contract: table name, columns, and logical addressing.
//!
//! Addresses look like `content://<authority>/plants` (the collection) and
//! `content://<authority>/plants/<id>` (one record). They are parsed once by
//! an [`AddressMatcher`] into the tagged [`Address`] variant; everything
//! downstream matches on the variant instead of inspecting strings.

use serde::{Deserialize, Serialize};

use crate::error::{DbError, Result};

/// Default authority segment of plant addresses.
pub const CONTENT_AUTHORITY: &str = "com.example.android.inventoryapp";

/// Path segment naming the plant collection.
pub const PATH_PLANTS: &str = "plants";

/// Physical table holding plant records.
pub const TABLE_NAME: &str = "plants";

const SCHEME: &str = "content://";

/// Columns of the `plants` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Name,
    Price,
    Quantity,
    Image,
    SupplierName,
    SupplierPhone,
    SupplierEmail,
}

/// Storage class a column decodes as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    Text,
}

impl Column {
    /// All columns in table declaration order.
    pub const ALL: [Column; 8] = [
        Column::Id,
        Column::Name,
        Column::Price,
        Column::Quantity,
        Column::Image,
        Column::SupplierName,
        Column::SupplierPhone,
        Column::SupplierEmail,
    ];

    /// SQL column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Price => "price",
            Self::Quantity => "quantity",
            Self::Image => "image",
            Self::SupplierName => "supplier_name",
            Self::SupplierPhone => "supplier_phone",
            Self::SupplierEmail => "supplier_email",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "id" | "_id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "quantity" => Some(Self::Quantity),
            "image" => Some(Self::Image),
            "supplier_name" => Some(Self::SupplierName),
            "supplier_phone" => Some(Self::SupplierPhone),
            "supplier_email" => Some(Self::SupplierEmail),
            _ => None,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Id | Self::Quantity => ColumnKind::Integer,
            Self::Price => ColumnKind::Real,
            Self::Name
            | Self::Image
            | Self::SupplierName
            | Self::SupplierPhone
            | Self::SupplierEmail => ColumnKind::Text,
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A logical pointer to the whole collection or to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Address {
    Collection,
    Item(i64),
}

impl Address {
    pub fn item_id(&self) -> Option<i64> {
        match self {
            Self::Collection => None,
            Self::Item(id) => Some(*id),
        }
    }

    /// Whether an observer of `self` should hear about a change at `changed`.
    ///
    /// Collection observers hear everything; item observers hear their own
    /// id and whole-collection changes.
    pub fn observes(&self, changed: &Address) -> bool {
        match (self, changed) {
            (Self::Collection, _) => true,
            (Self::Item(_), Self::Collection) => true,
            (Self::Item(mine), Self::Item(other)) => mine == other,
        }
    }
}

/// Parses and renders plant addresses for one authority.
///
/// Built once at startup and handed to the record store.
#[derive(Debug, Clone)]
pub struct AddressMatcher {
    authority: String,
}

impl Default for AddressMatcher {
    fn default() -> Self {
        Self::new(CONTENT_AUTHORITY)
    }
}

impl AddressMatcher {
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
        }
    }

    /// Resolve a URI into an [`Address`].
    ///
    /// Accepts an optional trailing slash. The item id must be a
    /// non-negative decimal integer.
    pub fn resolve(&self, uri: &str) -> Result<Address> {
        let unknown = || DbError::UnknownAddress(uri.to_string());

        let rest = uri.strip_prefix(SCHEME).ok_or_else(unknown)?;
        let rest = rest.strip_prefix(self.authority.as_str()).ok_or_else(unknown)?;
        let rest = rest.strip_prefix('/').ok_or_else(unknown)?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);

        let mut segments = rest.split('/');
        if segments.next() != Some(PATH_PLANTS) {
            return Err(unknown());
        }
        match (segments.next(), segments.next()) {
            (None, _) => Ok(Address::Collection),
            (Some(id), None) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => {
                id.parse::<i64>().map(Address::Item).map_err(|_| unknown())
            }
            _ => Err(unknown()),
        }
    }

    /// Render an address as a URI.
    pub fn uri(&self, address: &Address) -> String {
        match address {
            Address::Collection => format!("{}{}/{}", SCHEME, self.authority, PATH_PLANTS),
            Address::Item(id) => format!("{}{}/{}/{}", SCHEME, self.authority, PATH_PLANTS, id),
        }
    }

    /// Content-type label distinguishing list responses from item responses.
    pub fn content_type(&self, address: &Address) -> String {
        match address {
            Address::Collection => format!("vnd.cursor.dir/{}/{}", self.authority, PATH_PLANTS),
            Address::Item(_) => format!("vnd.cursor.item/{}/{}", self.authority, PATH_PLANTS),
        }
    }
}

/// Anything the record store can turn into an [`Address`].
pub trait ToAddress {
    fn to_address(&self, matcher: &AddressMatcher) -> Result<Address>;
}

impl ToAddress for Address {
    fn to_address(&self, _matcher: &AddressMatcher) -> Result<Address> {
        Ok(*self)
    }
}

impl ToAddress for str {
    fn to_address(&self, matcher: &AddressMatcher) -> Result<Address> {
        matcher.resolve(self)
    }
}

impl ToAddress for String {
    fn to_address(&self, matcher: &AddressMatcher) -> Result<Address> {
        matcher.resolve(self)
    }
}

impl<T: ToAddress + ?Sized> ToAddress for &T {
    fn to_address(&self, matcher: &AddressMatcher) -> Result<Address> {
        (**self).to_address(matcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_collection_and_item() {
        let m = AddressMatcher::default();
        assert_eq!(
            m.resolve("content://com.example.android.inventoryapp/plants").unwrap(),
            Address::Collection
        );
        assert_eq!(
            m.resolve("content://com.example.android.inventoryapp/plants/").unwrap(),
            Address::Collection
        );
        assert_eq!(
            m.resolve("content://com.example.android.inventoryapp/plants/42").unwrap(),
            Address::Item(42)
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_shapes() {
        let m = AddressMatcher::default();
        for uri in [
            "content://com.example.android.inventoryapp/staff",
            "content://com.example.android.inventoryapp/plants/abc",
            "content://com.example.android.inventoryapp/plants/-1",
            "content://com.example.android.inventoryapp/plants/1/2",
            "content://other.authority/plants/1",
            "http://com.example.android.inventoryapp/plants",
            "content://com.example.android.inventoryappx/plants",
            "",
        ] {
            assert!(
                matches!(m.resolve(uri), Err(DbError::UnknownAddress(_))),
                "expected unknown address for {uri:?}"
            );
        }
    }

    #[test]
    fn test_uri_round_trips_through_resolve() {
        let m = AddressMatcher::new("test.plants");
        for address in [Address::Collection, Address::Item(7)] {
            assert_eq!(m.resolve(&m.uri(&address)).unwrap(), address);
        }
    }

    #[test]
    fn test_content_types_differ() {
        let m = AddressMatcher::default();
        let list = m.content_type(&Address::Collection);
        let item = m.content_type(&Address::Item(1));
        assert_eq!(list, "vnd.cursor.dir/com.example.android.inventoryapp/plants");
        assert_eq!(item, "vnd.cursor.item/com.example.android.inventoryapp/plants");
    }

    #[test]
    fn test_observes() {
        assert!(Address::Collection.observes(&Address::Item(3)));
        assert!(Address::Item(3).observes(&Address::Collection));
        assert!(Address::Item(3).observes(&Address::Item(3)));
        assert!(!Address::Item(3).observes(&Address::Item(4)));
    }

    #[test]
    fn test_column_parse_matches_as_str() {
        for column in Column::ALL {
            assert_eq!(Column::parse(column.as_str()), Some(column));
        }
        assert_eq!(Column::parse("colour"), None);
    }
}
