use colored::Colorize;

use homeshelf::category::Category;
use homeshelf::config::Settings;
use homeshelf::crafts::{CraftType, CraftViewModel, Idea, Inspiration, Material, Note};
use homeshelf::error::AppResult;
use homeshelf::query::ListQuery;
use homeshelf::storage::SharedStore;

use super::{
    badge, badge_with_icon, build_query, confirm, dim_id, done, not_found, parse_category,
    parse_id, print_empty, required, star,
};
use crate::cli::{
    CraftCommand, IdeaAddArgs, IdeaCommand, IdeaUpdateArgs, InspirationCommand, MaterialCommand,
    NoteCommand,
};

pub fn run(command: CraftCommand, store: SharedStore, settings: &Settings) -> AppResult<()> {
    let mut vm = CraftViewModel::new(store);
    match command {
        CraftCommand::Ideas(command) => run_ideas(&mut vm, command, settings),
        CraftCommand::Notes(command) => run_notes(&mut vm, command),
        CraftCommand::Materials(command) => run_materials(&mut vm, command, settings),
        CraftCommand::Inspirations(command) => run_inspirations(&mut vm, command, settings),
    }
}

fn run_ideas(vm: &mut CraftViewModel, command: IdeaCommand, settings: &Settings) -> AppResult<()> {
    match command {
        IdeaCommand::List(args) => {
            let query: ListQuery<CraftType> = build_query(&args, settings.default_sort)?;
            print_ideas(&vm.filtered_ideas(&query));
        }
        IdeaCommand::Show(arg) => {
            let id = parse_id(&arg.id)?;
            let idea = vm.idea(id).ok_or_else(|| not_found("idea", id))?;
            print_idea_detail(&idea, &vm.notes_for_idea(id));
        }
        IdeaCommand::Add(args) => {
            let idea = vm.add_idea(new_idea(args)?);
            done(format!("Added idea {} {}", idea.title.bold(), dim_id(idea.id)));
        }
        IdeaCommand::Update(args) => {
            let id = parse_id(&args.id)?;
            let idea = vm.idea(id).ok_or_else(|| not_found("idea", id))?;
            vm.update_idea(apply_update(idea, args)?);
            done("Idea updated");
        }
        IdeaCommand::Favorite(arg) => {
            let id = parse_id(&arg.id)?;
            if !vm.toggle_favorite(id) {
                return Err(not_found("idea", id));
            }
            done("Favorite toggled");
        }
        IdeaCommand::Archive(arg) => {
            let id = parse_id(&arg.id)?;
            if vm.archive_idea(id) {
                done("Archived");
            } else {
                print_empty("change (missing or already archived)");
            }
        }
        IdeaCommand::Restore(arg) => {
            let id = parse_id(&arg.id)?;
            if vm.restore_idea(id) {
                done("Restored");
            } else {
                print_empty("change (missing or not archived)");
            }
        }
        IdeaCommand::Delete(args) => {
            let id = parse_id(&args.id)?;
            let idea = vm.idea(id).ok_or_else(|| not_found("idea", id))?;
            if confirm(&format!("Delete {} permanently?", idea.title), args.yes)? {
                vm.delete_idea(id);
                done("Deleted");
            }
        }
        IdeaCommand::AddStep { id, text } => {
            let id = parse_id(&id)?;
            let step = vm
                .add_step(id, required("step", &text)?)
                .ok_or_else(|| not_found("idea", id))?;
            done(format!("Added step {}", dim_id(step.id)));
        }
        IdeaCommand::ToggleStep { id, step } => {
            let (id, step) = (parse_id(&id)?, parse_id(&step)?);
            if !vm.toggle_step(id, step) {
                return Err(not_found("step", step));
            }
            done("Step toggled");
        }
        IdeaCommand::RemoveStep { id, step } => {
            let (id, step) = (parse_id(&id)?, parse_id(&step)?);
            if !vm.remove_step(id, step) {
                return Err(not_found("step", step));
            }
            done("Step removed");
        }
    }
    Ok(())
}

fn run_notes(vm: &mut CraftViewModel, command: NoteCommand) -> AppResult<()> {
    match command {
        NoteCommand::List { query } => {
            let notes = vm.search_notes(&query);
            if notes.is_empty() {
                print_empty("notes");
            }
            for note in notes {
                print_note(&note);
            }
        }
        NoteCommand::Add { title, content, idea } => {
            let mut note = Note::new(required("title", &title)?, content);
            if let Some(raw) = idea {
                let idea_id = parse_id(&raw)?;
                if vm.idea(idea_id).is_none() {
                    return Err(not_found("idea", idea_id));
                }
                note = note.for_idea(idea_id);
            }
            let note = vm.add_note(note);
            done(format!("Added note {} {}", note.title.bold(), dim_id(note.id)));
        }
        NoteCommand::Update { id, title, content } => {
            let id = parse_id(&id)?;
            let mut note = vm.note(id).ok_or_else(|| not_found("note", id))?;
            if let Some(title) = title {
                note.title = required("title", &title)?;
            }
            if let Some(content) = content {
                note.content = content;
            }
            vm.update_note(note);
            done("Note updated");
        }
        NoteCommand::Delete(args) => {
            let id = parse_id(&args.id)?;
            let note = vm.note(id).ok_or_else(|| not_found("note", id))?;
            if confirm(&format!("Delete note {}?", note.title), args.yes)? {
                vm.delete_note(id);
                done("Deleted");
            }
        }
    }
    Ok(())
}

fn run_materials(
    vm: &mut CraftViewModel,
    command: MaterialCommand,
    settings: &Settings,
) -> AppResult<()> {
    match command {
        MaterialCommand::List(args) => {
            let query: ListQuery<CraftType> = build_query(&args, settings.default_sort)?;
            print_materials(&vm.filtered_materials(&query));
        }
        MaterialCommand::Add { name, craft_type, quantity, unit } => {
            let material = Material::new(required("name", &name)?, parse_category(&craft_type)?)
                .with_quantity(quantity, unit.trim());
            let material = vm.add_material(material);
            done(format!("Added material {} {}", material.name.bold(), dim_id(material.id)));
        }
        MaterialCommand::Adjust { id, delta } => {
            let id = parse_id(&id)?;
            if !vm.adjust_quantity(id, delta) {
                return Err(not_found("material", id));
            }
            done("Stock adjusted");
        }
        MaterialCommand::Delete(args) => {
            let id = parse_id(&args.id)?;
            if confirm("Delete this material?", args.yes)? {
                if !vm.delete_material(id) {
                    return Err(not_found("material", id));
                }
                done("Deleted");
            }
        }
    }
    Ok(())
}

fn run_inspirations(
    vm: &mut CraftViewModel,
    command: InspirationCommand,
    settings: &Settings,
) -> AppResult<()> {
    match command {
        InspirationCommand::List(args) => {
            let query: ListQuery<CraftType> = build_query(&args, settings.default_sort)?;
            let found = vm.filtered_inspirations(&query);
            if found.is_empty() {
                print_empty("inspirations");
            }
            for item in found {
                println!(
                    "{} {} {} {}",
                    star(item.is_favorite).yellow(),
                    badge(item.craft_type),
                    item.title.bold(),
                    dim_id(item.id)
                );
                if let Some(url) = &item.source_url {
                    println!("    {}", url.underline());
                }
            }
        }
        InspirationCommand::Add { title, craft_type, url, notes } => {
            let mut item =
                Inspiration::new(required("title", &title)?, parse_category(&craft_type)?);
            if let Some(url) = url {
                item = item.with_source(url);
            }
            item.notes = notes;
            let item = vm.add_inspiration(item);
            done(format!("Saved {} {}", item.title.bold(), dim_id(item.id)));
        }
        InspirationCommand::Favorite(arg) => {
            let id = parse_id(&arg.id)?;
            if !vm.toggle_inspiration_favorite(id) {
                return Err(not_found("inspiration", id));
            }
            done("Favorite toggled");
        }
        InspirationCommand::Delete(args) => {
            let id = parse_id(&args.id)?;
            if confirm("Delete this inspiration?", args.yes)? {
                if !vm.delete_inspiration(id) {
                    return Err(not_found("inspiration", id));
                }
                done("Deleted");
            }
        }
    }
    Ok(())
}

fn new_idea(args: IdeaAddArgs) -> AppResult<Idea> {
    let mut idea = Idea::new(required("title", &args.title)?, parse_category(&args.craft_type)?)
        .with_description(args.description)
        .with_difficulty(parse_category(&args.difficulty)?)
        .with_steps(args.steps);
    idea.materials = args.materials;
    Ok(idea)
}

fn apply_update(mut idea: Idea, args: IdeaUpdateArgs) -> AppResult<Idea> {
    if let Some(title) = &args.title {
        idea.title = required("title", title)?;
    }
    if let Some(raw) = &args.craft_type {
        idea.craft_type = parse_category(raw)?;
    }
    if let Some(raw) = &args.difficulty {
        idea.difficulty = parse_category(raw)?;
    }
    if let Some(description) = args.description {
        idea.description = description;
    }
    Ok(idea)
}

fn print_ideas(ideas: &[Idea]) {
    if ideas.is_empty() {
        print_empty("ideas");
        return;
    }
    for idea in ideas {
        let progress = if idea.steps.is_empty() {
            String::new()
        } else {
            format!(" {:.0}%", idea.progress() * 100.0)
        };
        println!(
            "{} {} {}{} {} {}",
            star(idea.is_favorite).yellow(),
            badge(idea.craft_type),
            idea.title.bold(),
            progress.green(),
            idea.difficulty.display_name().color(idea.difficulty.color()),
            dim_id(idea.id)
        );
    }
}

fn print_idea_detail(idea: &Idea, notes: &[Note]) {
    println!(
        "{} {}{}",
        badge_with_icon(idea.craft_type),
        idea.title.bold(),
        if idea.is_archived { " (archived)" } else { "" }
    );
    println!("  difficulty: {}", idea.difficulty);
    if !idea.description.is_empty() {
        println!("  {}", idea.description);
    }
    if !idea.materials.is_empty() {
        println!("  materials:  {}", idea.materials.join(", "));
    }
    for step in idea.steps.iter() {
        let check = if step.is_completed { "[x]".green() } else { "[ ]".normal() };
        println!("  {check} {} {}", step.text, dim_id(step.id));
    }
    println!("  modified:   {}", idea.modified_at.format("%Y-%m-%d %H:%M"));
    println!("  id:         {}", dim_id(idea.id));
    if !notes.is_empty() {
        println!("\n{}", "Notes".bold());
        for note in notes {
            print_note(note);
        }
    }
}

fn print_note(note: &Note) {
    println!(
        "{} {} {}",
        note.title.bold(),
        note.modified_at.format("%Y-%m-%d").to_string().dimmed(),
        dim_id(note.id)
    );
    if !note.content.is_empty() {
        println!("    {}", note.content);
    }
}

fn print_materials(materials: &[Material]) {
    if materials.is_empty() {
        print_empty("materials");
        return;
    }
    for material in materials {
        let stock = format!("{} {}", material.quantity, material.unit);
        let stock = if material.quantity == 0 { stock.red() } else { stock.normal() };
        println!(
            "{} {} {} {}",
            badge(material.craft_type),
            material.name.bold(),
            stock,
            dim_id(material.id)
        );
    }
}
