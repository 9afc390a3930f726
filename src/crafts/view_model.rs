use chrono::Utc;

use crate::crafts::models::{CraftStep, CraftType, Idea, Inspiration, Material, Note};
use crate::query::{self, ArchiveFilter, ListQuery};
use crate::record::{RecordId, RecordStore};
use crate::storage::{Gateway, SharedStore, keys};

/// State container for the craft-idea tracker: ideas with their steps,
/// free-form notes, a materials stash and saved inspirations.
pub struct CraftViewModel {
    ideas: RecordStore<Idea>,
    notes: RecordStore<Note>,
    materials: RecordStore<Material>,
    inspirations: RecordStore<Inspiration>,
    idea_gateway: Gateway<Idea>,
    note_gateway: Gateway<Note>,
    material_gateway: Gateway<Material>,
    inspiration_gateway: Gateway<Inspiration>,
}

impl CraftViewModel {
    pub fn new(store: SharedStore) -> Self {
        let idea_gateway = Gateway::new(store.clone(), keys::CRAFT_IDEAS);
        let note_gateway = Gateway::new(store.clone(), keys::CRAFT_NOTES);
        let material_gateway = Gateway::new(store.clone(), keys::CRAFT_MATERIALS);
        let inspiration_gateway = Gateway::new(store, keys::CRAFT_INSPIRATIONS);
        Self {
            ideas: RecordStore::from_vec(idea_gateway.load()),
            notes: RecordStore::from_vec(note_gateway.load()),
            materials: RecordStore::from_vec(material_gateway.load()),
            inspirations: RecordStore::from_vec(inspiration_gateway.load()),
            idea_gateway,
            note_gateway,
            material_gateway,
            inspiration_gateway,
        }
    }

    // Ideas

    pub fn ideas(&self) -> &[Idea] {
        self.ideas.as_slice()
    }

    pub fn idea(&self, id: RecordId) -> Option<Idea> {
        self.ideas.find(id).cloned()
    }

    pub fn filtered_ideas(&self, query: &ListQuery<CraftType>) -> Vec<Idea> {
        query::apply(self.ideas.as_slice(), query)
    }

    pub fn archived_ideas(&self) -> Vec<Idea> {
        self.filtered_ideas(&ListQuery::new().archive(ArchiveFilter::Archived))
    }

    pub fn favorite_ideas(&self) -> Vec<Idea> {
        self.filtered_ideas(&ListQuery::new().favorites_only())
    }

    pub fn add_idea(&mut self, idea: Idea) -> Idea {
        self.ideas.append(idea.clone());
        self.save_ideas();
        idea
    }

    /// Replaces the stored idea and refreshes its modification time.
    pub fn update_idea(&mut self, mut idea: Idea) -> bool {
        idea.modified_at = Utc::now();
        let changed = self.ideas.replace(idea.id, idea);
        self.save_ideas();
        changed
    }

    pub fn toggle_favorite(&mut self, id: RecordId) -> bool {
        let changed = self.ideas.update(id, |i| i.is_favorite = !i.is_favorite);
        self.save_ideas();
        changed
    }

    pub fn archive_idea(&mut self, id: RecordId) -> bool {
        self.set_archived(id, true)
    }

    pub fn restore_idea(&mut self, id: RecordId) -> bool {
        self.set_archived(id, false)
    }

    pub fn delete_idea(&mut self, id: RecordId) -> bool {
        let removed = self.ideas.remove(id).is_some();
        self.save_ideas();
        removed
    }

    pub fn add_step(&mut self, idea_id: RecordId, text: impl Into<String>) -> Option<CraftStep> {
        let step = CraftStep::new(text);
        let added = self.touch_idea(idea_id, |i| i.steps.append(step.clone()));
        added.then_some(step)
    }

    pub fn remove_step(&mut self, idea_id: RecordId, step_id: RecordId) -> bool {
        let mut removed = false;
        self.touch_idea(idea_id, |i| removed = i.steps.remove(step_id).is_some());
        removed
    }

    /// Flips one step's completion flag.
    pub fn toggle_step(&mut self, idea_id: RecordId, step_id: RecordId) -> bool {
        let mut toggled = false;
        self.touch_idea(idea_id, |i| {
            toggled = i.steps.update(step_id, |s| s.is_completed = !s.is_completed);
        });
        toggled
    }

    fn set_archived(&mut self, id: RecordId, archived: bool) -> bool {
        let changed = match self.ideas.find_mut(id) {
            Some(idea) if idea.is_archived != archived => {
                idea.is_archived = archived;
                true
            }
            _ => false,
        };
        self.save_ideas();
        changed
    }

    fn touch_idea(&mut self, id: RecordId, f: impl FnOnce(&mut Idea)) -> bool {
        let changed = self.ideas.update(id, |idea| {
            f(idea);
            idea.modified_at = Utc::now();
        });
        self.save_ideas();
        changed
    }

    fn save_ideas(&self) {
        self.idea_gateway.save(self.ideas.as_slice());
    }

    // Notes

    pub fn notes(&self) -> &[Note] {
        self.notes.as_slice()
    }

    pub fn note(&self, id: RecordId) -> Option<Note> {
        self.notes.find(id).cloned()
    }

    /// Notes matching `text` in title or content, most recently edited first.
    pub fn search_notes(&self, text: &str) -> Vec<Note> {
        let mut found: Vec<Note> = self
            .notes
            .iter()
            .filter(|n| {
                query::contains_folded(&n.title, text) || query::contains_folded(&n.content, text)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        found
    }

    pub fn notes_for_idea(&self, idea_id: RecordId) -> Vec<Note> {
        self.notes
            .iter()
            .filter(|n| n.idea_id == Some(idea_id))
            .cloned()
            .collect()
    }

    pub fn add_note(&mut self, note: Note) -> Note {
        self.notes.append(note.clone());
        self.save_notes();
        note
    }

    pub fn update_note(&mut self, mut note: Note) -> bool {
        note.modified_at = Utc::now();
        let changed = self.notes.replace(note.id, note);
        self.save_notes();
        changed
    }

    pub fn delete_note(&mut self, id: RecordId) -> bool {
        let removed = self.notes.remove(id).is_some();
        self.save_notes();
        removed
    }

    fn save_notes(&self) {
        self.note_gateway.save(self.notes.as_slice());
    }

    // Materials

    pub fn materials(&self) -> &[Material] {
        self.materials.as_slice()
    }

    pub fn filtered_materials(&self, query: &ListQuery<CraftType>) -> Vec<Material> {
        query::apply(self.materials.as_slice(), query)
    }

    pub fn add_material(&mut self, material: Material) -> Material {
        self.materials.append(material.clone());
        self.save_materials();
        material
    }

    pub fn update_material(&mut self, material: Material) -> bool {
        let changed = self.materials.replace(material.id, material);
        self.save_materials();
        changed
    }

    /// Adds `delta` to the stock, saturating at zero and at `u32::MAX`.
    pub fn adjust_quantity(&mut self, id: RecordId, delta: i64) -> bool {
        let changed = self.materials.update(id, |m| {
            let next = i64::from(m.quantity).saturating_add(delta).clamp(0, i64::from(u32::MAX));
            m.quantity = u32::try_from(next).unwrap_or(0);
        });
        self.save_materials();
        changed
    }

    pub fn delete_material(&mut self, id: RecordId) -> bool {
        let removed = self.materials.remove(id).is_some();
        self.save_materials();
        removed
    }

    fn save_materials(&self) {
        self.material_gateway.save(self.materials.as_slice());
    }

    // Inspirations

    pub fn inspirations(&self) -> &[Inspiration] {
        self.inspirations.as_slice()
    }

    pub fn filtered_inspirations(&self, query: &ListQuery<CraftType>) -> Vec<Inspiration> {
        query::apply(self.inspirations.as_slice(), query)
    }

    pub fn add_inspiration(&mut self, inspiration: Inspiration) -> Inspiration {
        self.inspirations.append(inspiration.clone());
        self.save_inspirations();
        inspiration
    }

    pub fn update_inspiration(&mut self, inspiration: Inspiration) -> bool {
        let changed = self.inspirations.replace(inspiration.id, inspiration);
        self.save_inspirations();
        changed
    }

    pub fn toggle_inspiration_favorite(&mut self, id: RecordId) -> bool {
        let changed = self.inspirations.update(id, |i| i.is_favorite = !i.is_favorite);
        self.save_inspirations();
        changed
    }

    pub fn delete_inspiration(&mut self, id: RecordId) -> bool {
        let removed = self.inspirations.remove(id).is_some();
        self.save_inspirations();
        removed
    }

    fn save_inspirations(&self) {
        self.inspiration_gateway.save(self.inspirations.as_slice());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crafts::models::Difficulty;
    use crate::query::SortMode;
    use crate::storage::MemoryStore;
    use ulid::Ulid;

    fn titles(ideas: &[Idea]) -> Vec<&str> {
        ideas.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn update_refreshes_modified_at_and_persists() {
        let store = MemoryStore::shared();
        let mut vm = CraftViewModel::new(store.clone());
        let idea = vm.add_idea(Idea::new("Scarf", CraftType::Knitting));

        let mut edited = idea.clone();
        edited.title = "Striped scarf".into();
        edited.difficulty = Difficulty::Intermediate;
        assert!(vm.update_idea(edited));

        let reloaded = CraftViewModel::new(store);
        let stored = reloaded.idea(idea.id).unwrap();
        assert_eq!(stored.title, "Striped scarf");
        assert!(stored.modified_at >= idea.modified_at);
        assert_eq!(stored.created_at, idea.created_at);
    }

    #[test]
    fn archive_keeps_favorite_and_moves_to_archived_view() {
        let mut vm = CraftViewModel::new(MemoryStore::shared());
        let vase = vm.add_idea(Idea::new("Coil vase", CraftType::Pottery));
        vm.add_idea(Idea::new("Bookmark", CraftType::Paper));
        vm.toggle_favorite(vase.id);

        assert!(vm.archive_idea(vase.id));
        assert_eq!(titles(&vm.filtered_ideas(&ListQuery::new())), vec!["Bookmark"]);
        assert_eq!(titles(&vm.archived_ideas()), vec!["Coil vase"]);
        assert!(vm.idea(vase.id).unwrap().is_favorite);
        assert!(vm.favorite_ideas().is_empty());

        assert!(vm.restore_idea(vase.id));
        assert_eq!(titles(&vm.favorite_ideas()), vec!["Coil vase"]);
    }

    #[test]
    fn steps_toggle_independently() {
        let mut vm = CraftViewModel::new(MemoryStore::shared());
        let idea = vm.add_idea(
            Idea::new("Earrings", CraftType::Jewelry).with_steps(["Pick beads", "Assemble"]),
        );
        let first = idea.steps.as_slice()[0].id;

        assert!(vm.toggle_step(idea.id, first));
        let current = vm.idea(idea.id).unwrap();
        assert!(current.steps.find(first).unwrap().is_completed);
        assert_eq!(current.progress(), 0.5);

        let extra = vm.add_step(idea.id, "Package").unwrap();
        assert_eq!(vm.idea(idea.id).unwrap().steps.len(), 3);
        assert!(vm.remove_step(idea.id, extra.id));
        assert!(!vm.remove_step(idea.id, extra.id));

        assert!(!vm.toggle_step(idea.id, Ulid::new()));
        assert!(vm.add_step(Ulid::new(), "Nowhere").is_none());
    }

    #[test]
    fn filtered_ideas_by_type_and_text() {
        let mut vm = CraftViewModel::new(MemoryStore::shared());
        let mut hat = Idea::new("Beanie", CraftType::Knitting);
        hat.materials = vec!["Merino yarn".into()];
        vm.add_idea(hat);
        vm.add_idea(Idea::new("Amigurumi bear", CraftType::Crochet));
        vm.add_idea(Idea::new("Watercolor cards", CraftType::Painting));

        let yarn = vm.filtered_ideas(&ListQuery::new().text("merino"));
        assert_eq!(titles(&yarn), vec!["Beanie"]);

        let crochet = vm.filtered_ideas(&ListQuery::new().category(CraftType::Crochet));
        assert_eq!(titles(&crochet), vec!["Amigurumi bear"]);

        let by_type = vm.filtered_ideas(&ListQuery::new().sort(SortMode::Category));
        assert_eq!(titles(&by_type), vec!["Amigurumi bear", "Beanie", "Watercolor cards"]);
    }

    #[test]
    fn notes_search_and_link() {
        let mut vm = CraftViewModel::new(MemoryStore::shared());
        let idea = vm.add_idea(Idea::new("Quilt", CraftType::Sewing));
        vm.add_note(Note::new("Fabric shop", "Ask about batting").for_idea(idea.id));
        vm.add_note(Note::new("Random", "Nothing here"));

        assert_eq!(vm.search_notes("BATTING").len(), 1);
        assert_eq!(vm.search_notes("").len(), 2);
        assert_eq!(vm.notes_for_idea(idea.id).len(), 1);

        // Deleting the idea leaves the note's reference dangling.
        vm.delete_idea(idea.id);
        assert_eq!(vm.notes_for_idea(idea.id).len(), 1);
    }

    #[test]
    fn material_quantity_clamps_at_zero() {
        let mut vm = CraftViewModel::new(MemoryStore::shared());
        let yarn =
            vm.add_material(Material::new("Yarn", CraftType::Knitting).with_quantity(3, "skeins"));
        assert!(vm.adjust_quantity(yarn.id, 2));
        assert_eq!(vm.materials()[0].quantity, 5);
        assert!(vm.adjust_quantity(yarn.id, -10));
        assert_eq!(vm.materials()[0].quantity, 0);
        assert!(!vm.adjust_quantity(Ulid::new(), 1));
    }

    #[test]
    fn material_quantity_saturates_at_extremes() {
        let mut vm = CraftViewModel::new(MemoryStore::shared());
        let beads =
            vm.add_material(Material::new("Seed beads", CraftType::Jewelry).with_quantity(5, "g"));
        assert!(vm.adjust_quantity(beads.id, i64::MAX));
        assert_eq!(vm.materials()[0].quantity, u32::MAX);
        assert!(vm.adjust_quantity(beads.id, i64::MAX));
        assert_eq!(vm.materials()[0].quantity, u32::MAX);
        assert!(vm.adjust_quantity(beads.id, i64::MIN));
        assert_eq!(vm.materials()[0].quantity, 0);
    }

    #[test]
    fn material_update_replaces_and_persists() {
        let store = MemoryStore::shared();
        let mut vm = CraftViewModel::new(store.clone());
        let felt =
            vm.add_material(Material::new("Felt", CraftType::Sewing).with_quantity(2, "sheets"));

        let mut edited = felt.clone();
        edited.name = "Wool felt".into();
        edited.notes = "Grey and mustard".into();
        assert!(vm.update_material(edited));

        let reloaded = CraftViewModel::new(store);
        let stored = &reloaded.materials()[0];
        assert_eq!(stored.name, "Wool felt");
        assert_eq!(stored.created_at, felt.created_at);
        assert_eq!(reloaded.materials().len(), 1);

        let stranger = Material::new("Ghost", CraftType::Other);
        assert!(!vm.update_material(stranger));
        assert_eq!(vm.materials().len(), 1);
    }

    #[test]
    fn inspiration_update_replaces_and_persists() {
        let store = MemoryStore::shared();
        let mut vm = CraftViewModel::new(store.clone());
        let pin = vm.add_inspiration(Inspiration::new("Woven basket", CraftType::Other));

        let mut edited = pin.clone();
        edited.notes = "Try with jute".into();
        edited.source_url = Some("https://example.com/basket".into());
        assert!(vm.update_inspiration(edited.clone()));

        let reloaded = CraftViewModel::new(store);
        assert_eq!(reloaded.inspirations(), &[edited][..]);

        assert!(!vm.update_inspiration(Inspiration::new("Ghost", CraftType::Other)));
        assert_eq!(vm.inspirations().len(), 1);
    }

    #[test]
    fn inspirations_favorite_filter() {
        let mut vm = CraftViewModel::new(MemoryStore::shared());
        let pin = vm.add_inspiration(
            Inspiration::new("Macrame wall hanging", CraftType::Other)
                .with_source("https://example.com/macrame"),
        );
        vm.add_inspiration(Inspiration::new("Ceramic glaze test", CraftType::Pottery));

        assert!(vm.toggle_inspiration_favorite(pin.id));
        let favs = vm.filtered_inspirations(&ListQuery::new().favorites_only());
        assert_eq!(favs.len(), 1);
        let by_url = vm.filtered_inspirations(&ListQuery::new().text("example.com"));
        assert_eq!(by_url[0].id, pin.id);
    }
}
