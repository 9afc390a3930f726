use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::category::{Category, CategoryEntry, category_text_impls};
use crate::query::Listable;
use crate::record::{Record, RecordId, RecordStore};

/// Products expiring within this many days are flagged.
pub const EXPIRY_WARNING_DAYS: i64 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Skincare,
    Makeup,
    Haircare,
    Fragrance,
    Bodycare,
    Nails,
    Tools,
}

impl Category for ProductCategory {
    const TABLE: &'static [CategoryEntry<Self>] = &[
        CategoryEntry {
            variant: Self::Skincare,
            raw: "skincare",
            display_name: "Skincare",
            icon: "drop",
            color: "cyan",
        },
        CategoryEntry {
            variant: Self::Makeup,
            raw: "makeup",
            display_name: "Makeup",
            icon: "paintbrush",
            color: "magenta",
        },
        CategoryEntry {
            variant: Self::Haircare,
            raw: "haircare",
            display_name: "Haircare",
            icon: "comb",
            color: "yellow",
        },
        CategoryEntry {
            variant: Self::Fragrance,
            raw: "fragrance",
            display_name: "Fragrance",
            icon: "wind",
            color: "bright magenta",
        },
        CategoryEntry {
            variant: Self::Bodycare,
            raw: "bodycare",
            display_name: "Body Care",
            icon: "hand.raised",
            color: "green",
        },
        CategoryEntry {
            variant: Self::Nails,
            raw: "nails",
            display_name: "Nails",
            icon: "sparkle",
            color: "red",
        },
        CategoryEntry {
            variant: Self::Tools,
            raw: "tools",
            display_name: "Tools",
            icon: "wrench",
            color: "white",
        },
    ];
}

category_text_impls!(ProductCategory);

/// A drawer, shelf or bag holding products.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLocation {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub products: RecordStore<Product>,
    pub created_at: DateTime<Utc>,
}

impl StorageLocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Ulid::new(),
            name: name.into(),
            description: String::new(),
            products: RecordStore::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Record for StorageLocation {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    pub category: ProductCategory,
    /// Always the id of the location whose list holds this product.
    pub location_id: RecordId,
    pub expiration_date: Option<DateTime<Utc>>,
    pub opened_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_favorite: bool,
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub usage_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// `location_id` is overwritten when the product is added to a location.
    pub fn new(name: impl Into<String>, category: ProductCategory) -> Self {
        Self {
            id: Ulid::new(),
            name: name.into(),
            brand: String::new(),
            category,
            location_id: Ulid::nil(),
            expiration_date: None,
            opened_date: None,
            notes: String::new(),
            is_favorite: false,
            last_used: None,
            usage_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn expires(mut self, at: DateTime<Utc>) -> Self {
        self.expiration_date = Some(at);
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.is_some_and(|at| at <= now)
    }

    pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
        let horizon = now + Duration::days(EXPIRY_WARNING_DAYS);
        self.expiration_date
            .is_some_and(|at| at > now && at <= horizon)
    }
}

impl Record for Product {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Listable for Product {
    type Category = ProductCategory;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.brand.as_str(), self.notes.as_str()]
    }

    fn primary_name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> ProductCategory {
        self.category
    }

    fn sort_date(&self) -> Option<DateTime<Utc>> {
        self.expiration_date
    }

    fn secondary(&self) -> &str {
        &self.brand
    }

    fn is_favorite(&self) -> bool {
        self.is_favorite
    }
}
