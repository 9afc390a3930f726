use chrono::{DateTime, Utc};

use crate::plants::models::{Instruction, Plant, PlantCategory, Task, TaskType};
use crate::query::{self, ArchiveFilter, ListQuery, SortMode, compare_dates_missing_last};
use crate::record::{RecordId, RecordStore};
use crate::storage::{Gateway, SharedStore, keys};

/// State container for the plant-care tracker.
///
/// Owns the plant, task and instruction collections. Every mutation is
/// written through to storage before returning, so the next query (or a
/// freshly constructed view-model over the same store) sees it.
pub struct PlantViewModel {
    plants: RecordStore<Plant>,
    tasks: RecordStore<Task>,
    instructions: RecordStore<Instruction>,
    plant_gateway: Gateway<Plant>,
    task_gateway: Gateway<Task>,
    instruction_gateway: Gateway<Instruction>,
}

impl PlantViewModel {
    pub fn new(store: SharedStore) -> Self {
        let plant_gateway = Gateway::new(store.clone(), keys::PLANTS);
        let task_gateway = Gateway::new(store.clone(), keys::PLANT_TASKS);
        let instruction_gateway = Gateway::new(store, keys::PLANT_INSTRUCTIONS);
        Self {
            plants: RecordStore::from_vec(plant_gateway.load()),
            tasks: RecordStore::from_vec(task_gateway.load()),
            instructions: RecordStore::from_vec(instruction_gateway.load()),
            plant_gateway,
            task_gateway,
            instruction_gateway,
        }
    }

    // Plants

    pub fn plants(&self) -> &[Plant] {
        self.plants.as_slice()
    }

    pub fn plant(&self, id: RecordId) -> Option<Plant> {
        self.plants.find(id).cloned()
    }

    pub fn filtered_plants(&self, query: &ListQuery<PlantCategory>) -> Vec<Plant> {
        query::apply(self.plants.as_slice(), query)
    }

    /// Shorthand for the main list: active plants matching `text` and
    /// `category`, sorted by `sort`.
    pub fn search_plants(
        &self,
        text: &str,
        category: Option<PlantCategory>,
        sort: SortMode,
    ) -> Vec<Plant> {
        let query = ListQuery {
            text: text.to_string(),
            category,
            sort,
            ..ListQuery::default()
        };
        self.filtered_plants(&query)
    }

    pub fn archived_plants(&self) -> Vec<Plant> {
        self.filtered_plants(&ListQuery::new().archive(ArchiveFilter::Archived))
    }

    pub fn favorite_plants(&self) -> Vec<Plant> {
        self.filtered_plants(&ListQuery::new().favorites_only())
    }

    /// Active plants due for water, soonest first; never-watered plants last.
    pub fn plants_needing_water(&self, now: DateTime<Utc>) -> Vec<Plant> {
        let mut due: Vec<Plant> = self
            .plants
            .iter()
            .filter(|p| !p.is_archived && p.care.needs_water(now))
            .cloned()
            .collect();
        query::sort_records(&mut due, SortMode::Date);
        due
    }

    pub fn add_plant(&mut self, plant: Plant) -> Plant {
        tracing::debug!(id = %plant.id, name = %plant.name, "adding plant");
        self.plants.append(plant.clone());
        self.save_plants();
        plant
    }

    pub fn update_plant(&mut self, plant: Plant) -> bool {
        let changed = self.plants.replace(plant.id, plant);
        self.save_plants();
        changed
    }

    pub fn toggle_favorite(&mut self, id: RecordId) -> bool {
        let changed = self.plants.update(id, |p| p.is_favorite = !p.is_favorite);
        self.save_plants();
        changed
    }

    /// Soft-delete. Favorite state is left alone.
    pub fn archive_plant(&mut self, id: RecordId) -> bool {
        self.set_archived(id, true)
    }

    pub fn restore_plant(&mut self, id: RecordId) -> bool {
        self.set_archived(id, false)
    }

    /// Hard delete. Tasks that referenced the plant keep their dangling id.
    pub fn delete_plant(&mut self, id: RecordId) -> bool {
        let removed = self.plants.remove(id).is_some();
        self.save_plants();
        removed
    }

    pub fn water_plant(&mut self, id: RecordId) -> bool {
        let changed = self.plants.update(id, |p| p.care.last_watered = Some(Utc::now()));
        self.save_plants();
        changed
    }

    pub fn fertilize_plant(&mut self, id: RecordId) -> bool {
        let changed = self
            .plants
            .update(id, |p| p.care.last_fertilized = Some(Utc::now()));
        self.save_plants();
        changed
    }

    fn set_archived(&mut self, id: RecordId, archived: bool) -> bool {
        let changed = match self.plants.find_mut(id) {
            Some(plant) if plant.is_archived != archived => {
                plant.is_archived = archived;
                true
            }
            _ => false,
        };
        self.save_plants();
        changed
    }

    fn save_plants(&self) {
        self.plant_gateway.save(self.plants.as_slice());
    }

    // Tasks

    pub fn tasks(&self) -> &[Task] {
        self.tasks.as_slice()
    }

    pub fn task(&self, id: RecordId) -> Option<Task> {
        self.tasks.find(id).cloned()
    }

    /// Completed tasks sit in the archived scope of the query.
    pub fn filtered_tasks(&self, query: &ListQuery<TaskType>) -> Vec<Task> {
        query::apply(self.tasks.as_slice(), query)
    }

    pub fn tasks_for_plant(&self, plant_id: RecordId) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|t| t.plant_id == Some(plant_id))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| compare_dates_missing_last(a.due_date, b.due_date));
        tasks
    }

    /// Open tasks in due order, undated ones last.
    pub fn upcoming_tasks(&self) -> Vec<Task> {
        self.filtered_tasks(&ListQuery::new().sort(SortMode::Date))
    }

    pub fn expiring_tasks(&self, now: DateTime<Utc>) -> Vec<Task> {
        self.upcoming_tasks()
            .into_iter()
            .filter(|t| t.is_expiring_soon(now))
            .collect()
    }

    pub fn overdue_tasks(&self, now: DateTime<Utc>) -> Vec<Task> {
        self.upcoming_tasks()
            .into_iter()
            .filter(|t| t.is_overdue(now))
            .collect()
    }

    pub fn add_task(&mut self, task: Task) -> Task {
        self.tasks.append(task.clone());
        self.save_tasks();
        task
    }

    pub fn update_task(&mut self, task: Task) -> bool {
        let changed = self.tasks.replace(task.id, task);
        self.save_tasks();
        changed
    }

    pub fn toggle_task_completion(&mut self, id: RecordId) -> bool {
        let changed = self.tasks.update(id, |t| {
            t.is_completed = !t.is_completed;
            t.completed_at = t.is_completed.then(Utc::now);
        });
        self.save_tasks();
        changed
    }

    pub fn delete_task(&mut self, id: RecordId) -> bool {
        let removed = self.tasks.remove(id).is_some();
        self.save_tasks();
        removed
    }

    fn save_tasks(&self) {
        self.task_gateway.save(self.tasks.as_slice());
    }

    // Instructions

    pub fn instructions(&self) -> &[Instruction] {
        self.instructions.as_slice()
    }

    pub fn instruction(&self, id: RecordId) -> Option<Instruction> {
        self.instructions.find(id).cloned()
    }

    pub fn filtered_instructions(&self, query: &ListQuery<PlantCategory>) -> Vec<Instruction> {
        query::apply(self.instructions.as_slice(), query)
    }

    pub fn add_instruction(&mut self, instruction: Instruction) -> Instruction {
        self.instructions.append(instruction.clone());
        self.save_instructions();
        instruction
    }

    pub fn update_instruction(&mut self, instruction: Instruction) -> bool {
        let changed = self.instructions.replace(instruction.id, instruction);
        self.save_instructions();
        changed
    }

    pub fn delete_instruction(&mut self, id: RecordId) -> bool {
        let removed = self.instructions.remove(id).is_some();
        self.save_instructions();
        removed
    }

    fn save_instructions(&self) {
        self.instruction_gateway.save(self.instructions.as_slice());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::Duration;
    use ulid::Ulid;

    fn names(plants: &[Plant]) -> Vec<&str> {
        plants.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn fern_and_cactus_scenario() {
        let store = MemoryStore::shared();
        let mut vm = PlantViewModel::new(store.clone());
        assert!(vm.plants().is_empty());

        let fern = vm.add_plant(Plant::new("Fern", PlantCategory::Indoor));
        let reloaded = PlantViewModel::new(store.clone());
        assert_eq!(names(reloaded.plants()), vec!["Fern"]);

        vm.add_plant(Plant::new("Cactus", PlantCategory::Outdoor));

        let by_text = vm.filtered_plants(&ListQuery::new().text("fer"));
        assert_eq!(names(&by_text), vec!["Fern"]);

        let by_category = vm.filtered_plants(&ListQuery::new().category(PlantCategory::Outdoor));
        assert_eq!(names(&by_category), vec!["Cactus"]);

        assert!(vm.archive_plant(fern.id));
        assert_eq!(names(&vm.filtered_plants(&ListQuery::new())), vec!["Cactus"]);
        assert_eq!(names(&vm.archived_plants()), vec!["Fern"]);
    }

    #[test]
    fn archive_restore_round_trip_only_touches_flag() {
        let mut vm = PlantViewModel::new(MemoryStore::shared());
        let plant = vm.add_plant(Plant::new("Pothos", PlantCategory::Tropical));
        vm.toggle_favorite(plant.id);
        let before = vm.plant(plant.id).unwrap();

        assert!(vm.archive_plant(plant.id));
        assert!(!vm.archive_plant(plant.id));
        let archived = vm.plant(plant.id).unwrap();
        assert!(archived.is_archived);
        assert!(archived.is_favorite);

        assert!(vm.restore_plant(plant.id));
        assert!(!vm.restore_plant(plant.id));
        assert_eq!(vm.plant(plant.id).unwrap(), before);
    }

    #[test]
    fn missing_ids_are_silent_noops() {
        let mut vm = PlantViewModel::new(MemoryStore::shared());
        let ghost = Ulid::new();
        assert!(!vm.toggle_favorite(ghost));
        assert!(!vm.archive_plant(ghost));
        assert!(!vm.delete_plant(ghost));
        assert!(!vm.water_plant(ghost));
        assert!(!vm.update_plant(Plant::new("Ghost", PlantCategory::Herb)));
        assert!(vm.plants().is_empty());
    }

    #[test]
    fn delete_plant_leaves_tasks_dangling() {
        let mut vm = PlantViewModel::new(MemoryStore::shared());
        let basil = vm.add_plant(Plant::new("Basil", PlantCategory::Herb));
        let task = vm.add_task(Task::new("Pinch tops", TaskType::Pruning).for_plant(basil.id));

        assert!(vm.delete_plant(basil.id));
        assert!(vm.plant(basil.id).is_none());
        assert_eq!(vm.task(task.id).unwrap().plant_id, Some(basil.id));
        assert_eq!(vm.tasks_for_plant(basil.id).len(), 1);
    }

    #[test]
    fn watering_updates_schedule_and_persists() {
        let store = MemoryStore::shared();
        let mut vm = PlantViewModel::new(store.clone());
        let fern = vm.add_plant(Plant::new("Fern", PlantCategory::Indoor));
        let now = Utc::now();
        assert_eq!(vm.plants_needing_water(now).len(), 1);

        assert!(vm.water_plant(fern.id));
        assert!(vm.plants_needing_water(now).is_empty());

        let reloaded = PlantViewModel::new(store);
        assert!(reloaded.plant(fern.id).unwrap().care.last_watered.is_some());
    }

    #[test]
    fn task_completion_moves_task_out_of_upcoming() {
        let mut vm = PlantViewModel::new(MemoryStore::shared());
        let now = Utc::now();
        let soon =
            vm.add_task(Task::new("Water", TaskType::Watering).due(now + Duration::hours(2)));
        let later =
            vm.add_task(Task::new("Repot", TaskType::Repotting).due(now + Duration::days(5)));
        let undated = vm.add_task(Task::new("Mist", TaskType::Misting));

        let ids: Vec<_> = vm.upcoming_tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![soon.id, later.id, undated.id]);
        assert_eq!(vm.expiring_tasks(now).len(), 1);

        assert!(vm.toggle_task_completion(soon.id));
        let done = vm.task(soon.id).unwrap();
        assert!(done.is_completed);
        assert!(done.completed_at.is_some());
        assert_eq!(vm.upcoming_tasks().len(), 2);

        let completed = vm.filtered_tasks(&ListQuery::new().archive(ArchiveFilter::Archived));
        assert_eq!(completed.len(), 1);

        assert!(vm.toggle_task_completion(soon.id));
        assert!(vm.task(soon.id).unwrap().completed_at.is_none());
    }

    #[test]
    fn instructions_filter_by_category() {
        let mut vm = PlantViewModel::new(MemoryStore::shared());
        let mut guide = Instruction::new("Watering succulents", PlantCategory::Succulent);
        guide.summary = "Soak and dry".into();
        vm.add_instruction(guide);
        vm.add_instruction(Instruction::new("Pruning herbs", PlantCategory::Herb));

        let found = vm.filtered_instructions(&ListQuery::new().text("soak"));
        assert_eq!(found.len(), 1);
        assert!(found[0].steps.is_empty());

        let herbs = vm.filtered_instructions(&ListQuery::new().category(PlantCategory::Herb));
        assert_eq!(herbs[0].title, "Pruning herbs");
    }

    #[test]
    fn search_plants_sorts_by_species() {
        let mut vm = PlantViewModel::new(MemoryStore::shared());
        vm.add_plant(Plant::new("Zed", PlantCategory::Indoor).with_species("Aloe vera"));
        vm.add_plant(Plant::new("Amy", PlantCategory::Indoor).with_species("Zamioculcas"));
        let sorted = vm.search_plants("", None, SortMode::Secondary);
        assert_eq!(names(&sorted), vec!["Zed", "Amy"]);
    }

    #[test]
    fn task_update_replaces_in_place_and_persists() {
        let store = MemoryStore::shared();
        let mut vm = PlantViewModel::new(store.clone());
        let first = vm.add_task(Task::new("Mist leaves", TaskType::Watering));
        let second = vm.add_task(Task::new("Check roots", TaskType::Repotting));

        let mut edited = first.clone();
        edited.title = "Mist fern leaves".into();
        edited.required_items = vec!["Spray bottle".into()];
        assert!(vm.update_task(edited.clone()));

        let reloaded = PlantViewModel::new(store);
        assert_eq!(reloaded.tasks().len(), 2);
        assert_eq!(reloaded.tasks()[0], edited);
        assert_eq!(reloaded.tasks()[1].id, second.id);

        assert!(!vm.update_task(Task::new("Ghost", TaskType::Misting)));
        assert_eq!(vm.tasks().len(), 2);
    }

    #[test]
    fn instruction_update_replaces_in_place_and_persists() {
        let store = MemoryStore::shared();
        let mut vm = PlantViewModel::new(store.clone());
        let guide = vm.add_instruction(Instruction::new("Repotting basics", PlantCategory::Indoor));

        let mut edited = guide.clone();
        edited.summary = "Go one pot size up".into();
        edited.steps = vec!["Water the day before".into(), "Loosen roots".into()];
        assert!(vm.update_instruction(edited.clone()));

        let reloaded = PlantViewModel::new(store);
        assert_eq!(reloaded.instruction(guide.id), Some(edited));
        assert_eq!(reloaded.instructions().len(), 1);

        assert!(!vm.update_instruction(Instruction::new("Ghost", PlantCategory::Herb)));
        assert_eq!(vm.instructions().len(), 1);
    }
}
