use chrono::{DateTime, Utc};

use crate::cosmetics::models::{Product, ProductCategory, StorageLocation};
use crate::query::{self, ListQuery, SortMode};
use crate::record::{RecordId, RecordStore};
use crate::storage::{Gateway, SharedStore, StorageError, keys};

/// State container for the cosmetics organizer.
///
/// Products live inside their storage location, and the whole tree is
/// persisted as one blob, so every mutation (including a move between
/// locations) is a single save.
pub struct CosmeticsViewModel {
    locations: RecordStore<StorageLocation>,
    gateway: Gateway<StorageLocation>,
}

impl CosmeticsViewModel {
    pub fn new(store: SharedStore) -> Self {
        let gateway = Gateway::new(store, keys::STORAGE_LOCATIONS);
        Self {
            locations: RecordStore::from_vec(gateway.load()),
            gateway,
        }
    }

    // Locations

    pub fn locations(&self) -> &[StorageLocation] {
        self.locations.as_slice()
    }

    pub fn location(&self, id: RecordId) -> Option<StorageLocation> {
        self.locations.find(id).cloned()
    }

    /// Locations whose name or description matches `text`, by name.
    pub fn search_locations(&self, text: &str) -> Vec<StorageLocation> {
        let mut found: Vec<StorageLocation> = self
            .locations
            .iter()
            .filter(|l| {
                query::contains_folded(&l.name, text)
                    || query::contains_folded(&l.description, text)
            })
            .cloned()
            .collect();
        found.sort_by_cached_key(|l| query::fold(&l.name));
        found
    }

    pub fn add_location(&mut self, location: StorageLocation) -> StorageLocation {
        self.locations.append(location.clone());
        self.save();
        location
    }

    /// Renames or re-describes a location; its products are left untouched.
    pub fn update_location(&mut self, id: RecordId, name: String, description: String) -> bool {
        let changed = self.locations.update(id, |l| {
            l.name = name;
            l.description = description;
        });
        self.save();
        changed
    }

    /// Deletes each product in the location, then the location itself.
    pub fn delete_location(&mut self, id: RecordId) -> bool {
        let Some(location) = self.locations.find_mut(id) else {
            self.save();
            return false;
        };

        let children: Vec<RecordId> = location.products.iter().map(|p| p.id).collect();
        for child in &children {
            location.products.remove(*child);
        }
        self.locations.remove(id);
        tracing::info!(location = %id, products = children.len(), "deleted storage location");
        self.save();
        true
    }

    // Products

    pub fn product(&self, id: RecordId) -> Option<Product> {
        self.locations
            .iter()
            .find_map(|l| l.products.find(id))
            .cloned()
    }

    pub fn all_products(&self) -> Vec<Product> {
        self.locations
            .iter()
            .flat_map(|l| l.products.iter().cloned())
            .collect()
    }

    /// Query scoped to one location's products.
    pub fn products_in(
        &self,
        location_id: RecordId,
        query: &ListQuery<ProductCategory>,
    ) -> Vec<Product> {
        match self.locations.find(location_id) {
            Some(location) => query::apply(location.products.as_slice(), query),
            None => Vec::new(),
        }
    }

    /// Query across every location.
    pub fn search_products(&self, query: &ListQuery<ProductCategory>) -> Vec<Product> {
        query::apply(&self.all_products(), query)
    }

    pub fn favorites(&self) -> Vec<Product> {
        self.search_products(&ListQuery::new().favorites_only())
    }

    /// Expired products, oldest expiry first.
    pub fn expired_products(&self, now: DateTime<Utc>) -> Vec<Product> {
        self.dated_products(|p| p.is_expired(now))
    }

    pub fn expiring_soon(&self, now: DateTime<Utc>) -> Vec<Product> {
        self.dated_products(|p| p.is_expiring_soon(now))
    }

    fn dated_products(&self, keep: impl Fn(&Product) -> bool) -> Vec<Product> {
        let mut out: Vec<Product> = self.all_products().into_iter().filter(|p| keep(p)).collect();
        query::sort_records(&mut out, SortMode::Date);
        out
    }

    /// Adds `product` to `location_id`, stamping its container reference.
    /// Returns `None` when the location does not exist.
    pub fn add_product(&mut self, location_id: RecordId, mut product: Product) -> Option<Product> {
        let location = self.locations.find_mut(location_id)?;
        product.location_id = location_id;
        location.products.append(product.clone());
        self.save();
        Some(product)
    }

    /// Replaces the product in whichever location holds it. The stored
    /// container reference wins over the one on `product`; use
    /// [`move_product`](Self::move_product) to relocate.
    pub fn update_product(&mut self, mut product: Product) -> bool {
        let changed = match self.holder_mut(product.id) {
            Some(location) => {
                product.location_id = location.id;
                location.products.replace(product.id, product)
            }
            None => false,
        };
        self.save();
        changed
    }

    pub fn delete_product(&mut self, id: RecordId) -> bool {
        let removed = self
            .holder_mut(id)
            .and_then(|l| l.products.remove(id))
            .is_some();
        self.save();
        removed
    }

    pub fn toggle_favorite(&mut self, id: RecordId) -> bool {
        let changed = self
            .holder_mut(id)
            .is_some_and(|l| l.products.update(id, |p| p.is_favorite = !p.is_favorite));
        self.save();
        changed
    }

    pub fn mark_used(&mut self, id: RecordId) -> bool {
        let changed = self.holder_mut(id).is_some_and(|l| {
            l.products.update(id, |p| {
                p.last_used = Some(Utc::now());
                p.usage_count = p.usage_count.saturating_add(1);
            })
        });
        self.save();
        changed
    }

    /// Moves a product to another location: removed from the source list,
    /// appended to the target list, container reference rewritten. A no-op
    /// when the target is missing or already holds the product.
    pub fn move_product(&mut self, id: RecordId, target_id: RecordId) -> bool {
        let Some(source_id) = self.holder_mut(id).map(|l| l.id) else {
            return false;
        };
        if source_id == target_id || !self.locations.contains(target_id) {
            return false;
        }

        let Some(mut product) = self
            .locations
            .find_mut(source_id)
            .and_then(|l| l.products.remove(id))
        else {
            return false;
        };
        product.location_id = target_id;
        self.locations.update(target_id, |l| l.products.append(product));
        tracing::info!(product = %id, from = %source_id, to = %target_id, "moved product");
        self.save();
        true
    }

    /// Pretty JSON of the whole location tree, for sharing.
    pub fn export_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self.locations.as_slice())?)
    }

    fn holder_mut(&mut self, product_id: RecordId) -> Option<&mut StorageLocation> {
        self.locations
            .iter_mut()
            .find(|l| l.products.contains(product_id))
    }

    fn save(&self) {
        self.gateway.save(self.locations.as_slice());
    }
}
