//! The record store: addressed CRUD over the plants table.
//!
//! Every call resolves its address through the injected matcher, validates
//! before mutating, runs one engine operation, and notifies subscribers when
//! at least one row changed. The store holds no mutable state of its own and
//! can be cloned freely across tasks.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::debug;

use crate::contract::{Address, AddressMatcher, Column, ToAddress};
use crate::error::{DbError, Result};
use crate::filter::{Filter, Sort};
use crate::notify::{ChangeNotifier, ChangeStream};
use crate::types::{FieldSet, PlantRecord, Rows};
use crate::validation::{validate, Mode};
use crate::PlantDb;

/// Addressed, validating CRUD front for [`PlantDb`].
#[derive(Clone)]
pub struct PlantStore {
    db: PlantDb,
    matcher: Arc<AddressMatcher>,
    notifier: ChangeNotifier,
}

impl PlantStore {
    pub fn new(db: PlantDb, matcher: AddressMatcher) -> Self {
        Self {
            db,
            matcher: Arc::new(matcher),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn db(&self) -> &PlantDb {
        &self.db
    }

    pub fn matcher(&self) -> &AddressMatcher {
        &self.matcher
    }

    /// Resolve an address with this store's matcher.
    pub fn resolve(&self, address: impl ToAddress) -> Result<Address> {
        address.to_address(&self.matcher)
    }

    /// URI for an address.
    pub fn uri(&self, address: &Address) -> String {
        self.matcher.uri(address)
    }

    /// List or item content-type label for an address.
    pub fn content_type(&self, address: impl ToAddress) -> Result<String> {
        let address = self.resolve(address)?;
        Ok(self.matcher.content_type(&address))
    }

    /// Read rows at an address.
    ///
    /// For an item address the filter is replaced by `id = <id>`. An empty or
    /// missing projection returns every column.
    pub async fn read(
        &self,
        address: impl ToAddress,
        projection: Option<&[Column]>,
        filter: Option<&Filter>,
        sort: Option<&Sort>,
    ) -> Result<Rows> {
        let address = self.resolve(address)?;
        let projection = match projection {
            Some(columns) if !columns.is_empty() => columns,
            _ => &Column::ALL[..],
        };

        let rows = match address {
            Address::Collection => self.db.select(projection, filter, sort).await?,
            Address::Item(id) => {
                let by_id = Filter::id(id);
                self.db.select(projection, Some(&by_id), sort).await?
            }
        };
        Ok(Rows::new(rows))
    }

    /// Run [`read`](Self::read) on a background task.
    ///
    /// The result arrives on the returned channel. Must be called from
    /// within a tokio runtime.
    pub fn spawn_read(
        &self,
        address: impl ToAddress,
        projection: Option<Vec<Column>>,
        filter: Option<Filter>,
        sort: Option<Sort>,
    ) -> oneshot::Receiver<Result<Rows>> {
        let (tx, rx) = oneshot::channel();
        let address = self.resolve(address);
        let store = self.clone();
        tokio::spawn(async move {
            let result = match address {
                Ok(address) => {
                    store
                        .read(address, projection.as_deref(), filter.as_ref(), sort.as_ref())
                        .await
                }
                Err(err) => Err(err),
            };
            // The caller may have stopped waiting.
            let _ = tx.send(result);
        });
        rx
    }

    /// Fetch one full record by item address.
    pub async fn get(&self, address: impl ToAddress) -> Result<Option<PlantRecord>> {
        match self.resolve(address)? {
            Address::Item(id) => self
                .db
                .find(id, &Column::ALL)
                .await?
                .map(PlantRecord::try_from)
                .transpose(),
            Address::Collection => Err(DbError::UnknownAddress(
                "get requires an item address".to_string(),
            )),
        }
    }

    /// Create a record from a full field set, returning its item address.
    ///
    /// Only the collection address accepts inserts.
    pub async fn create(&self, fields: impl Into<FieldSet>) -> Result<Address> {
        self.create_at(Address::Collection, fields).await
    }

    /// Create a record via an explicit address (must be the collection).
    pub async fn create_at(
        &self,
        address: impl ToAddress,
        fields: impl Into<FieldSet>,
    ) -> Result<Address> {
        let address = self.resolve(address)?;
        if let Address::Item(_) = address {
            return Err(DbError::UnknownAddress(format!(
                "insertion is not supported for {}",
                self.uri(&address)
            )));
        }

        let fields = fields.into();
        validate(&fields, Mode::Create)?;

        let id = self
            .db
            .insert(&fields)
            .await?
            .ok_or_else(|| DbError::InsertFailed(self.uri(&address)))?;

        self.notifier.notify(Address::Collection);
        debug!(id, "Created plant");
        Ok(Address::Item(id))
    }

    /// Apply a partial update.
    ///
    /// Item addresses update exactly that row and ignore `filter`; the
    /// collection address updates rows matching `filter`, or all rows.
    /// Returns the number of rows changed; zero is not an error.
    pub async fn update(
        &self,
        address: impl ToAddress,
        fields: impl Into<FieldSet>,
        filter: Option<&Filter>,
    ) -> Result<u64> {
        let address = self.resolve(address)?;
        let fields = fields.into();
        validate(&fields, Mode::Update)?;

        if fields.is_empty() {
            return Ok(0);
        }

        let updated = match address {
            Address::Collection => self.db.update_where(&fields, filter).await?,
            Address::Item(id) => {
                let by_id = Filter::id(id);
                self.db.update_where(&fields, Some(&by_id)).await?
            }
        };

        if updated > 0 {
            self.notifier.notify(address);
        }
        debug!(?address, updated, "Updated plants");
        Ok(updated)
    }

    /// Delete rows.
    ///
    /// Item addresses delete exactly that row and ignore `filter`. The
    /// collection address with no filter deletes everything; callers facing
    /// users must confirm before issuing that.
    pub async fn delete(&self, address: impl ToAddress, filter: Option<&Filter>) -> Result<u64> {
        let address = self.resolve(address)?;

        let removed = match address {
            Address::Collection => self.db.delete_where(filter).await?,
            Address::Item(id) => {
                let by_id = Filter::id(id);
                self.db.delete_where(Some(&by_id)).await?
            }
        };

        if removed > 0 {
            self.notifier.notify(address);
        }
        debug!(?address, removed, "Deleted plants");
        Ok(removed)
    }

    /// Subscribe to change notifications for an address.
    pub fn subscribe(&self, address: impl ToAddress) -> Result<ChangeStream> {
        let address = self.resolve(address)?;
        Ok(self.notifier.subscribe(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreConfig;

    async fn store() -> PlantStore {
        let db = PlantDb::open(&StoreConfig::sqlite_memory()).await.unwrap();
        PlantStore::new(db, AddressMatcher::default())
    }

    fn fern() -> FieldSet {
        FieldSet::new()
            .name("Fern")
            .price(4.5)
            .quantity(10)
            .supplier_name("Greenhouse")
            .supplier_email("orders@greenhouse.test")
    }

    #[tokio::test]
    async fn test_create_returns_item_address() {
        let store = store().await;
        let address = store.create(fern()).await.unwrap();
        assert!(matches!(address, Address::Item(id) if id > 0));
        assert_eq!(
            store.content_type(address).unwrap(),
            "vnd.cursor.item/com.example.android.inventoryapp/plants"
        );
    }

    #[tokio::test]
    async fn test_create_at_item_address_is_rejected() {
        let store = store().await;
        let err = store.create_at(Address::Item(1), fern()).await.unwrap_err();
        assert!(matches!(err, DbError::UnknownAddress(_)));
    }

    #[tokio::test]
    async fn test_unknown_uri_fails_every_operation() {
        let store = store().await;
        let bad = "content://com.example.android.inventoryapp/staff";
        let unknown = |err: Option<DbError>| matches!(err, Some(DbError::UnknownAddress(_)));

        assert!(unknown(store.read(bad, None, None, None).await.err()));
        assert!(unknown(store.update(bad, fern(), None).await.err()));
        assert!(unknown(store.delete(bad, None).await.err()));
        assert!(unknown(store.subscribe(bad).err()));
    }

    #[tokio::test]
    async fn test_item_read_ignores_caller_filter() {
        let store = store().await;
        let fern_addr = store.create(fern()).await.unwrap();
        store.create(fern().name("Cactus")).await.unwrap();

        let cactus_only = Filter::eq(Column::Name, "Cactus");
        let rows: Vec<_> = store
            .read(fern_addr, None, Some(&cactus_only), None)
            .await
            .unwrap()
            .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text(Column::Name), Some("Fern"));
    }

    #[tokio::test]
    async fn test_item_delete_ignores_caller_filter() {
        let store = store().await;
        let fern_addr = store.create(fern()).await.unwrap();
        store.create(fern().name("Cactus")).await.unwrap();

        let everything = Filter::And(vec![]);
        assert_eq!(store.delete(fern_addr, Some(&everything)).await.unwrap(), 1);
        assert_eq!(store.db().count(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_requires_item_address() {
        let store = store().await;
        let address = store.create(fern()).await.unwrap();
        let record = store.get(address).await.unwrap().unwrap();
        assert_eq!(record.name, "Fern");
        assert!(store.get(Address::Item(999)).await.unwrap().is_none());
        assert!(store.get(Address::Collection).await.is_err());
    }

    #[tokio::test]
    async fn test_spawn_read_delivers_on_channel() {
        let store = store().await;
        store.create(fern()).await.unwrap();

        let rx = store.spawn_read(Address::Collection, Some(vec![Column::Name]), None, None);
        let rows: Vec<_> = rx.await.unwrap().unwrap().collect();
        assert_eq!(rows.len(), 1);

        let rx = store.spawn_read("content://nope/plants", None, None, None);
        assert!(matches!(rx.await.unwrap(), Err(DbError::UnknownAddress(_))));
    }
}
