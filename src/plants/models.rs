use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::category::{Category, CategoryEntry, category_text_impls};
use crate::query::Listable;
use crate::record::{Record, RecordId};

/// A task counts as expiring soon when it is due within this window.
pub const TASK_EXPIRY_WINDOW_HOURS: i64 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantCategory {
    Indoor,
    Outdoor,
    Succulent,
    Herb,
    Flowering,
    Tropical,
}

impl Category for PlantCategory {
    const TABLE: &'static [CategoryEntry<Self>] = &[
        CategoryEntry {
            variant: Self::Indoor,
            raw: "indoor",
            display_name: "Indoor",
            icon: "house",
            color: "green",
        },
        CategoryEntry {
            variant: Self::Outdoor,
            raw: "outdoor",
            display_name: "Outdoor",
            icon: "sun.max",
            color: "yellow",
        },
        CategoryEntry {
            variant: Self::Succulent,
            raw: "succulent",
            display_name: "Succulent",
            icon: "drop.triangle",
            color: "cyan",
        },
        CategoryEntry {
            variant: Self::Herb,
            raw: "herb",
            display_name: "Herb",
            icon: "leaf",
            color: "bright green",
        },
        CategoryEntry {
            variant: Self::Flowering,
            raw: "flowering",
            display_name: "Flowering",
            icon: "camera.macro",
            color: "magenta",
        },
        CategoryEntry {
            variant: Self::Tropical,
            raw: "tropical",
            display_name: "Tropical",
            icon: "tree",
            color: "blue",
        },
    ];
}

category_text_impls!(PlantCategory);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SunlightLevel {
    Low,
    #[default]
    Medium,
    Bright,
    Direct,
}

impl Category for SunlightLevel {
    const TABLE: &'static [CategoryEntry<Self>] = &[
        CategoryEntry {
            variant: Self::Low,
            raw: "low",
            display_name: "Low light",
            icon: "cloud",
            color: "bright black",
        },
        CategoryEntry {
            variant: Self::Medium,
            raw: "medium",
            display_name: "Medium light",
            icon: "cloud.sun",
            color: "white",
        },
        CategoryEntry {
            variant: Self::Bright,
            raw: "bright",
            display_name: "Bright indirect",
            icon: "sun.min",
            color: "yellow",
        },
        CategoryEntry {
            variant: Self::Direct,
            raw: "direct",
            display_name: "Direct sun",
            icon: "sun.max",
            color: "bright yellow",
        },
    ];
}

category_text_impls!(SunlightLevel);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareSchedule {
    pub watering_interval_days: u32,
    pub fertilizing_interval_days: Option<u32>,
    #[serde(default)]
    pub sunlight: SunlightLevel,
    pub last_watered: Option<DateTime<Utc>>,
    pub last_fertilized: Option<DateTime<Utc>>,
}

impl Default for CareSchedule {
    fn default() -> Self {
        Self {
            watering_interval_days: 7,
            fertilizing_interval_days: None,
            sunlight: SunlightLevel::default(),
            last_watered: None,
            last_fertilized: None,
        }
    }
}

impl CareSchedule {
    /// `None` until the plant has been watered at least once, or when the
    /// interval pushes the date out of range.
    pub fn next_watering(&self) -> Option<DateTime<Utc>> {
        add_days(self.last_watered?, self.watering_interval_days)
    }

    pub fn next_fertilizing(&self) -> Option<DateTime<Utc>> {
        add_days(self.last_fertilized?, self.fertilizing_interval_days?)
    }

    /// A plant that was never watered needs water. One whose next watering
    /// falls outside the representable range never does.
    pub fn needs_water(&self, now: DateTime<Utc>) -> bool {
        match self.last_watered {
            None => true,
            Some(_) => self.next_watering().is_some_and(|due| due <= now),
        }
    }
}

fn add_days(at: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    at.checked_add_signed(Duration::try_days(i64::from(days))?)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub species: String,
    pub category: PlantCategory,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub care: CareSchedule,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
}

impl Plant {
    pub fn new(name: impl Into<String>, category: PlantCategory) -> Self {
        Self {
            id: Ulid::new(),
            name: name.into(),
            species: String::new(),
            category,
            location: String::new(),
            notes: String::new(),
            care: CareSchedule::default(),
            is_favorite: false,
            is_archived: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = species.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_care(mut self, care: CareSchedule) -> Self {
        self.care = care;
        self
    }
}

impl Record for Plant {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Listable for Plant {
    type Category = PlantCategory;

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.species.as_str(),
            self.location.as_str(),
            self.notes.as_str(),
        ]
    }

    fn primary_name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> PlantCategory {
        self.category
    }

    fn sort_date(&self) -> Option<DateTime<Utc>> {
        self.care.next_watering()
    }

    fn secondary(&self) -> &str {
        &self.species
    }

    fn is_archived(&self) -> bool {
        self.is_archived
    }

    fn is_favorite(&self) -> bool {
        self.is_favorite
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Watering,
    Fertilizing,
    Pruning,
    Repotting,
    Misting,
    PestControl,
}

impl Category for TaskType {
    const TABLE: &'static [CategoryEntry<Self>] = &[
        CategoryEntry {
            variant: Self::Watering,
            raw: "watering",
            display_name: "Watering",
            icon: "drop",
            color: "blue",
        },
        CategoryEntry {
            variant: Self::Fertilizing,
            raw: "fertilizing",
            display_name: "Fertilizing",
            icon: "sparkles",
            color: "green",
        },
        CategoryEntry {
            variant: Self::Pruning,
            raw: "pruning",
            display_name: "Pruning",
            icon: "scissors",
            color: "yellow",
        },
        CategoryEntry {
            variant: Self::Repotting,
            raw: "repotting",
            display_name: "Repotting",
            icon: "shippingbox",
            color: "red",
        },
        CategoryEntry {
            variant: Self::Misting,
            raw: "misting",
            display_name: "Misting",
            icon: "humidity",
            color: "cyan",
        },
        CategoryEntry {
            variant: Self::PestControl,
            raw: "pestcontrol",
            display_name: "Pest Control",
            icon: "ant",
            color: "magenta",
        },
    ];
}

category_text_impls!(TaskType);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    /// Soft reference; the plant may since have been deleted.
    pub plant_id: Option<RecordId>,
    pub task_type: TaskType,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub required_items: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            id: Ulid::new(),
            title: title.into(),
            plant_id: None,
            task_type,
            due_date: None,
            is_completed: false,
            completed_at: None,
            notes: String::new(),
            required_items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn for_plant(mut self, plant_id: RecordId) -> Self {
        self.plant_id = Some(plant_id);
        self
    }

    pub fn due(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.due_date.is_some_and(|due| due < now)
    }

    pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
        let window_end = now + Duration::hours(TASK_EXPIRY_WINDOW_HOURS);
        !self.is_completed && self.due_date.is_some_and(|due| due >= now && due <= window_end)
    }
}

impl Record for Task {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Listable for Task {
    type Category = TaskType;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.notes.as_str()];
        fields.extend(self.required_items.iter().map(String::as_str));
        fields
    }

    fn primary_name(&self) -> &str {
        &self.title
    }

    fn category(&self) -> TaskType {
        self.task_type
    }

    fn sort_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    // Completed tasks are listed through the archived scope.
    fn is_archived(&self) -> bool {
        self.is_completed
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub id: RecordId,
    pub title: String,
    pub category: PlantCategory,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub steps: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Instruction {
    pub fn new(title: impl Into<String>, category: PlantCategory) -> Self {
        Self {
            id: Ulid::new(),
            title: title.into(),
            category,
            summary: String::new(),
            steps: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

impl Record for Instruction {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl Listable for Instruction {
    type Category = PlantCategory;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.summary.as_str()]
    }

    fn primary_name(&self) -> &str {
        &self.title
    }

    fn category(&self) -> PlantCategory {
        self.category
    }

    fn sort_date(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::assert_table_consistent;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn category_tables_are_complete() {
        assert_table_consistent::<PlantCategory>();
        assert_table_consistent::<SunlightLevel>();
        assert_table_consistent::<TaskType>();
        assert_eq!(PlantCategory::all().len(), 6);
        assert_eq!(TaskType::all().len(), 6);
        assert_eq!(SunlightLevel::all().len(), 4);
    }

    #[test]
    fn category_parses_raw_or_display_name() {
        assert_eq!("indoor".parse::<PlantCategory>(), Ok(PlantCategory::Indoor));
        assert_eq!("Pest Control".parse::<TaskType>(), Ok(TaskType::PestControl));
        assert!("cloud forest".parse::<PlantCategory>().is_err());
        assert_eq!(PlantCategory::Herb.to_string(), "Herb");
    }

    #[test]
    fn watering_schedule() {
        let mut care = CareSchedule {
            watering_interval_days: 3,
            ..CareSchedule::default()
        };
        let now = at(2025, 3, 10, 12);
        assert!(care.needs_water(now));
        assert!(care.next_watering().is_none());

        care.last_watered = Some(at(2025, 3, 9, 12));
        assert_eq!(care.next_watering(), Some(at(2025, 3, 12, 12)));
        assert!(!care.needs_water(now));
        assert!(care.needs_water(at(2025, 3, 12, 12)));
    }

    #[test]
    fn fertilizing_needs_an_interval() {
        let mut care = CareSchedule {
            last_fertilized: Some(at(2025, 1, 1, 0)),
            ..CareSchedule::default()
        };
        assert!(care.next_fertilizing().is_none());
        care.fertilizing_interval_days = Some(30);
        assert_eq!(care.next_fertilizing(), Some(at(2025, 1, 31, 0)));
    }

    #[test]
    fn huge_intervals_do_not_overflow() {
        let now = at(2025, 3, 10, 12);
        let care = CareSchedule {
            watering_interval_days: u32::MAX,
            fertilizing_interval_days: Some(u32::MAX),
            last_watered: Some(now),
            last_fertilized: Some(now),
            ..CareSchedule::default()
        };
        assert!(care.next_watering().is_none());
        assert!(care.next_fertilizing().is_none());
        assert!(!care.needs_water(now));

        let plant = Plant::new("Ancient oak", PlantCategory::Outdoor).with_care(care);
        assert!(plant.sort_date().is_none());
    }

    #[test]
    fn task_expiry_window() {
        let now = at(2025, 5, 1, 8);
        let soon = Task::new("Water fern", TaskType::Watering).due(at(2025, 5, 1, 20));
        let later = Task::new("Repot", TaskType::Repotting).due(at(2025, 5, 4, 8));
        let late = Task::new("Prune", TaskType::Pruning).due(at(2025, 4, 30, 8));
        let undated = Task::new("Mist", TaskType::Misting);

        assert!(soon.is_expiring_soon(now));
        assert!(!later.is_expiring_soon(now));
        assert!(!late.is_expiring_soon(now));
        assert!(late.is_overdue(now));
        assert!(!undated.is_expiring_soon(now));
        assert!(!undated.is_overdue(now));

        let mut done = soon.clone();
        done.is_completed = true;
        assert!(!done.is_expiring_soon(now));
    }

    #[test]
    fn plant_json_uses_camel_case_and_raw_values() {
        let plant = Plant::new("Fern", PlantCategory::Indoor);
        let json = serde_json::to_value(&plant).unwrap();
        assert_eq!(json["category"], "indoor");
        assert_eq!(json["isFavorite"], false);
        assert_eq!(json["care"]["wateringIntervalDays"], 7);
        assert_eq!(json["id"], plant.id.to_string());
    }

    #[test]
    fn sparse_plant_json_fills_defaults() {
        let json = r#"{
            "id": "01HZY3V6Q4N3W2K5T8M9B0C1D2",
            "name": "Aloe",
            "category": "succulent",
            "createdAt": "2025-01-01T00:00:00Z"
        }"#;
        let plant: Plant = serde_json::from_str(json).unwrap();
        assert_eq!(plant.name, "Aloe");
        assert!(!plant.is_archived);
        assert_eq!(plant.care, CareSchedule::default());
    }
}
