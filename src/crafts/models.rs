use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::category::{Category, CategoryEntry, category_text_impls};
use crate::query::Listable;
use crate::record::{Record, RecordId, RecordStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CraftType {
    Knitting,
    Crochet,
    Sewing,
    Painting,
    Paper,
    Woodworking,
    Jewelry,
    Pottery,
    Other,
}

impl Category for CraftType {
    const TABLE: &'static [CategoryEntry<Self>] = &[
        CategoryEntry {
            variant: Self::Knitting,
            raw: "knitting",
            display_name: "Knitting",
            icon: "scribble",
            color: "magenta",
        },
        CategoryEntry {
            variant: Self::Crochet,
            raw: "crochet",
            display_name: "Crochet",
            icon: "link",
            color: "bright magenta",
        },
        CategoryEntry {
            variant: Self::Sewing,
            raw: "sewing",
            display_name: "Sewing",
            icon: "scissors",
            color: "red",
        },
        CategoryEntry {
            variant: Self::Painting,
            raw: "painting",
            display_name: "Painting",
            icon: "paintpalette",
            color: "blue",
        },
        CategoryEntry {
            variant: Self::Paper,
            raw: "paper",
            display_name: "Paper Craft",
            icon: "doc",
            color: "white",
        },
        CategoryEntry {
            variant: Self::Woodworking,
            raw: "woodworking",
            display_name: "Woodworking",
            icon: "hammer",
            color: "yellow",
        },
        CategoryEntry {
            variant: Self::Jewelry,
            raw: "jewelry",
            display_name: "Jewelry",
            icon: "sparkles",
            color: "cyan",
        },
        CategoryEntry {
            variant: Self::Pottery,
            raw: "pottery",
            display_name: "Pottery",
            icon: "cup.and.saucer",
            color: "bright red",
        },
        CategoryEntry {
            variant: Self::Other,
            raw: "other",
            display_name: "Other",
            icon: "square.grid.2x2",
            color: "bright black",
        },
    ];
}

category_text_impls!(CraftType);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Category for Difficulty {
    const TABLE: &'static [CategoryEntry<Self>] = &[
        CategoryEntry {
            variant: Self::Beginner,
            raw: "beginner",
            display_name: "Beginner",
            icon: "1.circle",
            color: "green",
        },
        CategoryEntry {
            variant: Self::Intermediate,
            raw: "intermediate",
            display_name: "Intermediate",
            icon: "2.circle",
            color: "yellow",
        },
        CategoryEntry {
            variant: Self::Advanced,
            raw: "advanced",
            display_name: "Advanced",
            icon: "3.circle",
            color: "red",
        },
    ];
}

category_text_impls!(Difficulty);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraftStep {
    pub id: RecordId,
    pub text: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl CraftStep {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Ulid::new(),
            text: text.into(),
            is_completed: false,
        }
    }
}

impl Record for CraftStep {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub craft_type: CraftType,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub steps: RecordStore<CraftStep>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Idea {
    pub fn new(title: impl Into<String>, craft_type: CraftType) -> Self {
        let now = Utc::now();
        Self {
            id: Ulid::new(),
            title: title.into(),
            description: String::new(),
            craft_type,
            difficulty: Difficulty::default(),
            steps: RecordStore::new(),
            materials: Vec::new(),
            is_favorite: false,
            is_archived: false,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for step in steps {
            self.steps.append(CraftStep::new(step));
        }
        self
    }

    /// Fraction of completed steps; an idea without steps is at zero.
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        let done = self.steps.iter().filter(|s| s.is_completed).count();
        done as f64 / self.steps.len() as f64
    }

    pub fn is_finished(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| s.is_completed)
    }
}

impl Record for Idea {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Listable for Idea {
    type Category = CraftType;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.materials.iter().map(String::as_str));
        fields
    }

    fn primary_name(&self) -> &str {
        &self.title
    }

    fn category(&self) -> CraftType {
        self.craft_type
    }

    fn sort_date(&self) -> Option<DateTime<Utc>> {
        Some(self.modified_at)
    }

    fn is_archived(&self) -> bool {
        self.is_archived
    }

    fn is_favorite(&self) -> bool {
        self.is_favorite
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub idea_id: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Ulid::new(),
            title: title.into(),
            content: content.into(),
            idea_id: None,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn for_idea(mut self, idea_id: RecordId) -> Self {
        self.idea_id = Some(idea_id);
        self
    }
}

impl Record for Note {
    fn id(&self) -> RecordId {
        self.id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub unit: String,
    pub craft_type: CraftType,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Material {
    pub fn new(name: impl Into<String>, craft_type: CraftType) -> Self {
        Self {
            id: Ulid::new(),
            name: name.into(),
            quantity: 0,
            unit: String::new(),
            craft_type,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_quantity(mut self, quantity: u32, unit: impl Into<String>) -> Self {
        self.quantity = quantity;
        self.unit = unit.into();
        self
    }
}

impl Record for Material {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Listable for Material {
    type Category = CraftType;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.unit.as_str(), self.notes.as_str()]
    }

    fn primary_name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> CraftType {
        self.craft_type
    }

    fn sort_date(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn secondary(&self) -> &str {
        &self.unit
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspiration {
    pub id: RecordId,
    pub title: String,
    pub source_url: Option<String>,
    #[serde(default)]
    pub notes: String,
    pub craft_type: CraftType,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
}

impl Inspiration {
    pub fn new(title: impl Into<String>, craft_type: CraftType) -> Self {
        Self {
            id: Ulid::new(),
            title: title.into(),
            source_url: None,
            notes: String::new(),
            craft_type,
            is_favorite: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_source(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }
}

impl Record for Inspiration {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Listable for Inspiration {
    type Category = CraftType;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.notes.as_str()];
        fields.extend(self.source_url.as_deref());
        fields
    }

    fn primary_name(&self) -> &str {
        &self.title
    }

    fn category(&self) -> CraftType {
        self.craft_type
    }

    fn sort_date(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }

    fn secondary(&self) -> &str {
        self.source_url.as_deref().unwrap_or_default()
    }

    fn is_favorite(&self) -> bool {
        self.is_favorite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::assert_table_consistent;

    #[test]
    fn category_tables_are_complete() {
        assert_table_consistent::<CraftType>();
        assert_table_consistent::<Difficulty>();
        assert_eq!(CraftType::all().len(), 9);
        assert_eq!(Difficulty::all().len(), 3);
    }

    #[test]
    fn progress_counts_completed_steps() {
        let mut idea = Idea::new("Granny square blanket", CraftType::Crochet)
            .with_steps(["Buy yarn", "Make squares", "Join", "Border"]);
        assert_eq!(idea.progress(), 0.0);
        assert!(!idea.is_finished());

        let first = idea.steps.as_slice()[0].id;
        idea.steps.update(first, |s| s.is_completed = true);
        assert_eq!(idea.progress(), 0.25);

        let empty = Idea::new("Someday", CraftType::Other);
        assert_eq!(empty.progress(), 0.0);
        assert!(!empty.is_finished());
    }

    #[test]
    fn idea_round_trips_through_json() {
        let idea = Idea::new("Tote bag", CraftType::Sewing)
            .with_difficulty(Difficulty::Intermediate)
            .with_steps(["Cut", "Sew"]);
        let json = serde_json::to_value(&idea).unwrap();
        assert_eq!(json["craftType"], "sewing");
        assert_eq!(json["difficulty"], "intermediate");
        assert_eq!(json["steps"][1]["text"], "Sew");
        assert_eq!(json["steps"][1]["isCompleted"], false);

        let back: Idea = serde_json::from_value(json).unwrap();
        assert_eq!(back, idea);
    }

    #[test]
    fn material_carries_creation_time() {
        let before = Utc::now();
        let yarn = Material::new("Yarn", CraftType::Knitting);
        assert!(yarn.created_at >= before);
        assert_eq!(yarn.sort_date(), Some(yarn.created_at));

        let json = serde_json::to_value(&yarn).unwrap();
        assert!(json["createdAt"].is_string());
        let back: Material = serde_json::from_value(json).unwrap();
        assert_eq!(back, yarn);
    }
}
