//! Reload behaviour of the three trackers over an on-disk store.

use std::fs;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use homeshelf::cosmetics::{CosmeticsViewModel, Product, ProductCategory, StorageLocation};
use homeshelf::crafts::{CraftType, CraftViewModel, Idea, Note};
use homeshelf::plants::{Plant, PlantCategory, PlantViewModel, Task, TaskType};
use homeshelf::query::{ArchiveFilter, ListQuery, SortMode};
use homeshelf::storage::{FileStore, SharedStore};

fn open(dir: &TempDir) -> SharedStore {
    Arc::new(FileStore::open(dir.path()).unwrap())
}

#[test]
fn fern_and_cactus() {
    let dir = tempfile::tempdir().unwrap();
    let mut vm = PlantViewModel::new(open(&dir));
    vm.add_plant(Plant::new("Fern", PlantCategory::Indoor));
    let cactus = vm.add_plant(Plant::new("Cactus", PlantCategory::Succulent));

    let all = vm.search_plants("", None, SortMode::Name);
    let names: Vec<_> = all.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Cactus", "Fern"]);

    vm.archive_plant(cactus.id);
    drop(vm);

    let vm = PlantViewModel::new(open(&dir));
    let active = vm.filtered_plants(&ListQuery::new());
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Fern");
    let archived = vm.archived_plants();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].id, cactus.id);
    assert!(archived[0].is_archived);
}

#[test]
fn plant_tasks_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let now = Utc::now();
    let mut vm = PlantViewModel::new(open(&dir));
    let basil = vm.add_plant(Plant::new("Basil", PlantCategory::Herb));
    let task = vm.add_task(
        Task::new("Trim flowers", TaskType::Pruning)
            .for_plant(basil.id)
            .due(now + Duration::hours(3)),
    );
    vm.toggle_task_completion(task.id);
    vm.water_plant(basil.id);

    let vm = PlantViewModel::new(open(&dir));
    let stored = vm.task(task.id).unwrap();
    assert!(stored.is_completed);
    assert!(stored.completed_at.is_some());
    assert!(vm.plant(basil.id).unwrap().care.last_watered.is_some());

    let done = vm.filtered_tasks(&ListQuery::new().archive(ArchiveFilter::Archived));
    assert_eq!(done.len(), 1);
    assert!(vm.upcoming_tasks().is_empty());
}

#[test]
fn location_delete_cascades_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut vm = CosmeticsViewModel::new(open(&dir));
    let drawer = vm.add_location(StorageLocation::new("Drawer"));
    let shelf = vm.add_location(StorageLocation::new("Shelf"));
    vm.add_product(drawer.id, Product::new("Serum", ProductCategory::Skincare));
    vm.add_product(drawer.id, Product::new("Lipstick", ProductCategory::Makeup));
    let kept = vm
        .add_product(shelf.id, Product::new("Shampoo", ProductCategory::Haircare))
        .unwrap();

    assert!(vm.delete_location(drawer.id));

    let vm = CosmeticsViewModel::new(open(&dir));
    assert_eq!(vm.locations().len(), 1);
    let products = vm.all_products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, kept.id);
}

#[test]
fn moved_product_persists_with_new_location() {
    let dir = tempfile::tempdir().unwrap();
    let mut vm = CosmeticsViewModel::new(open(&dir));
    let bag = vm.add_location(StorageLocation::new("Travel bag"));
    let cabinet = vm.add_location(StorageLocation::new("Cabinet"));
    let cream = vm
        .add_product(bag.id, Product::new("Hand cream", ProductCategory::Bodycare))
        .unwrap();

    assert!(vm.move_product(cream.id, cabinet.id));

    let vm = CosmeticsViewModel::new(open(&dir));
    assert!(vm.location(bag.id).unwrap().products.is_empty());
    let moved = vm.product(cream.id).unwrap();
    assert_eq!(moved.location_id, cabinet.id);
    assert_eq!(vm.products_in(cabinet.id, &ListQuery::new()).len(), 1);
}

#[test]
fn craft_collections_are_independent_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut vm = CraftViewModel::new(open(&dir));
    let idea = vm.add_idea(Idea::new("Tote bag", CraftType::Sewing).with_steps(["Cut", "Sew"]));
    vm.add_note(Note::new("Fabric", "Canvas, 1m").for_idea(idea.id));

    for file in ["craft_ideas.json", "craft_notes.json"] {
        assert!(dir.path().join(file).exists(), "{file} missing");
    }

    let step = vm.idea(idea.id).unwrap().steps.as_slice()[1].id;
    vm.toggle_step(idea.id, step);

    let vm = CraftViewModel::new(open(&dir));
    let stored = vm.idea(idea.id).unwrap();
    assert_eq!(stored.progress(), 0.5);
    assert_eq!(vm.notes_for_idea(idea.id).len(), 1);
}

#[test]
fn corrupt_collection_loads_empty_and_is_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("plants.json"), "[{\"broken\": ").unwrap();

    let mut vm = PlantViewModel::new(open(&dir));
    assert!(vm.plants().is_empty());

    vm.add_plant(Plant::new("Pothos", PlantCategory::Tropical));
    let vm = PlantViewModel::new(open(&dir));
    assert_eq!(vm.plants().len(), 1);
}

#[test]
fn persisted_json_uses_camel_case_and_raw_values() {
    let dir = tempfile::tempdir().unwrap();
    let mut vm = CosmeticsViewModel::new(open(&dir));
    let shelf = vm.add_location(StorageLocation::new("Shelf"));
    vm.add_product(shelf.id, Product::new("Body lotion", ProductCategory::Bodycare));

    let raw = fs::read_to_string(dir.path().join("storage_locations.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let product = &json[0]["products"][0];
    assert_eq!(product["category"], "bodycare");
    assert_eq!(product["locationId"], shelf.id.to_string());
    assert_eq!(product["usageCount"], 0);
}
