use chrono::Utc;
use colored::Colorize;

use homeshelf::config::Settings;
use homeshelf::error::AppResult;
use homeshelf::plants::{
    CareSchedule, Instruction, Plant, PlantCategory, PlantViewModel, SunlightLevel, Task, TaskType,
};
use homeshelf::query::ListQuery;
use homeshelf::storage::SharedStore;

use super::{
    badge, badge_with_icon, build_query, confirm, dim_id, done, not_found, parse_category,
    parse_date, parse_id, print_empty, required, short_date, star,
};
use crate::cli::{
    GuideCommand, PlantAddArgs, PlantCommand, PlantUpdateArgs, TaskAddArgs, TaskCommand,
};

pub fn run(command: PlantCommand, store: SharedStore, settings: &Settings) -> AppResult<()> {
    let mut vm = PlantViewModel::new(store);
    match command {
        PlantCommand::List(args) => {
            let query = build_query(&args, settings.default_sort)?;
            print_plants(&vm.filtered_plants(&query));
        }
        PlantCommand::Show(arg) => {
            let id = parse_id(&arg.id)?;
            let plant = vm.plant(id).ok_or_else(|| not_found("plant", id))?;
            print_plant_detail(&plant);
            let tasks = vm.tasks_for_plant(id);
            if !tasks.is_empty() {
                println!("\n{}", "Tasks".bold());
                print_tasks(&tasks);
            }
        }
        PlantCommand::Add(args) => {
            let plant = vm.add_plant(new_plant(args)?);
            done(format!("Added {} {}", plant.name.bold(), dim_id(plant.id)));
        }
        PlantCommand::Update(args) => {
            let id = parse_id(&args.id)?;
            let plant = vm.plant(id).ok_or_else(|| not_found("plant", id))?;
            vm.update_plant(apply_update(plant, args)?);
            done("Plant updated");
        }
        PlantCommand::Water(arg) => {
            let id = parse_id(&arg.id)?;
            if !vm.water_plant(id) {
                return Err(not_found("plant", id));
            }
            done("Watered");
        }
        PlantCommand::Fertilize(arg) => {
            let id = parse_id(&arg.id)?;
            if !vm.fertilize_plant(id) {
                return Err(not_found("plant", id));
            }
            done("Fertilized");
        }
        PlantCommand::Favorite(arg) => {
            let id = parse_id(&arg.id)?;
            if !vm.toggle_favorite(id) {
                return Err(not_found("plant", id));
            }
            done("Favorite toggled");
        }
        PlantCommand::Archive(arg) => {
            let id = parse_id(&arg.id)?;
            if vm.archive_plant(id) {
                done("Archived");
            } else {
                print_empty("change (missing or already archived)");
            }
        }
        PlantCommand::Restore(arg) => {
            let id = parse_id(&arg.id)?;
            if vm.restore_plant(id) {
                done("Restored");
            } else {
                print_empty("change (missing or not archived)");
            }
        }
        PlantCommand::Delete(args) => {
            let id = parse_id(&args.id)?;
            let plant = vm.plant(id).ok_or_else(|| not_found("plant", id))?;
            if confirm(&format!("Delete {} permanently?", plant.name), args.yes)? {
                vm.delete_plant(id);
                done("Deleted");
            }
        }
        PlantCommand::Due => print_due(&vm),
        PlantCommand::Tasks(command) => run_tasks(&mut vm, command, settings)?,
        PlantCommand::Guides(command) => run_guides(&mut vm, command, settings)?,
    }
    Ok(())
}

fn run_tasks(vm: &mut PlantViewModel, command: TaskCommand, settings: &Settings) -> AppResult<()> {
    match command {
        TaskCommand::List(args) => {
            let query: ListQuery<TaskType> = build_query(&args, settings.default_sort)?;
            print_tasks(&vm.filtered_tasks(&query));
        }
        TaskCommand::Add(args) => {
            let task = new_task(vm, args)?;
            let task = vm.add_task(task);
            done(format!("Added task {} {}", task.title.bold(), dim_id(task.id)));
        }
        TaskCommand::Toggle(arg) => {
            let id = parse_id(&arg.id)?;
            if !vm.toggle_task_completion(id) {
                return Err(not_found("task", id));
            }
            done("Task toggled");
        }
        TaskCommand::Delete(args) => {
            let id = parse_id(&args.id)?;
            let task = vm.task(id).ok_or_else(|| not_found("task", id))?;
            if confirm(&format!("Delete task {}?", task.title), args.yes)? {
                vm.delete_task(id);
                done("Deleted");
            }
        }
    }
    Ok(())
}

fn run_guides(
    vm: &mut PlantViewModel,
    command: GuideCommand,
    settings: &Settings,
) -> AppResult<()> {
    match command {
        GuideCommand::List(args) => {
            let query: ListQuery<PlantCategory> = build_query(&args, settings.default_sort)?;
            let guides = vm.filtered_instructions(&query);
            if guides.is_empty() {
                print_empty("care guides");
            }
            for guide in guides {
                println!("{} {} {}", badge(guide.category), guide.title.bold(), dim_id(guide.id));
                if !guide.summary.is_empty() {
                    println!("    {}", guide.summary);
                }
                for (n, step) in guide.steps.iter().enumerate() {
                    println!("    {}. {step}", n + 1);
                }
            }
        }
        GuideCommand::Add(args) => {
            let mut guide =
                Instruction::new(required("title", &args.title)?, parse_category(&args.category)?);
            guide.summary = args.summary;
            guide.steps = args.steps;
            let guide = vm.add_instruction(guide);
            done(format!("Added guide {} {}", guide.title.bold(), dim_id(guide.id)));
        }
        GuideCommand::Delete(args) => {
            let id = parse_id(&args.id)?;
            let guide = vm.instruction(id).ok_or_else(|| not_found("guide", id))?;
            if confirm(&format!("Delete guide {}?", guide.title), args.yes)? {
                vm.delete_instruction(id);
                done("Deleted");
            }
        }
    }
    Ok(())
}

fn new_plant(args: PlantAddArgs) -> AppResult<Plant> {
    let mut care = CareSchedule::default();
    if let Some(days) = args.water_every {
        care.watering_interval_days = days;
    }
    care.fertilizing_interval_days = args.fertilize_every;
    if let Some(level) = &args.sunlight {
        care.sunlight = parse_category::<SunlightLevel>(level)?;
    }
    let mut plant = Plant::new(required("name", &args.name)?, parse_category(&args.category)?)
        .with_species(args.species.trim())
        .with_location(args.location.trim())
        .with_care(care);
    plant.notes = args.notes;
    Ok(plant)
}

fn apply_update(mut plant: Plant, args: PlantUpdateArgs) -> AppResult<Plant> {
    if let Some(name) = &args.name {
        plant.name = required("name", name)?;
    }
    if let Some(category) = &args.category {
        plant.category = parse_category(category)?;
    }
    if let Some(species) = args.species {
        plant.species = species;
    }
    if let Some(location) = args.location {
        plant.location = location;
    }
    if let Some(notes) = args.notes {
        plant.notes = notes;
    }
    if let Some(days) = args.water_every {
        plant.care.watering_interval_days = days;
    }
    Ok(plant)
}

fn new_task(vm: &PlantViewModel, args: TaskAddArgs) -> AppResult<Task> {
    let mut task = Task::new(required("title", &args.title)?, parse_category(&args.task_type)?);
    if let Some(raw) = &args.plant {
        let plant_id = parse_id(raw)?;
        if vm.plant(plant_id).is_none() {
            return Err(not_found("plant", plant_id));
        }
        task = task.for_plant(plant_id);
    }
    if let Some(raw) = &args.due {
        task = task.due(parse_date(raw)?);
    }
    task.required_items = args.items;
    Ok(task)
}

fn print_plants(plants: &[Plant]) {
    if plants.is_empty() {
        print_empty("plants");
        return;
    }
    let now = Utc::now();
    for plant in plants {
        let water = if plant.care.needs_water(now) {
            "needs water".blue().to_string()
        } else {
            format!("water {}", short_date(plant.care.next_watering()))
        };
        println!(
            "{} {} {} {} {}",
            star(plant.is_favorite).yellow(),
            badge(plant.category),
            plant.name.bold(),
            water,
            dim_id(plant.id)
        );
    }
}

fn print_plant_detail(plant: &Plant) {
    println!(
        "{} {}{}",
        badge_with_icon(plant.category),
        plant.name.bold(),
        if plant.is_archived { " (archived)" } else { "" }
    );
    if !plant.species.is_empty() {
        println!("  species:    {}", plant.species.italic());
    }
    if !plant.location.is_empty() {
        println!("  location:   {}", plant.location);
    }
    println!("  sunlight:   {}", plant.care.sunlight);
    println!(
        "  watering:   every {} days, last {}, next {}",
        plant.care.watering_interval_days,
        short_date(plant.care.last_watered),
        short_date(plant.care.next_watering())
    );
    if let Some(days) = plant.care.fertilizing_interval_days {
        println!(
            "  fertilize:  every {days} days, next {}",
            short_date(plant.care.next_fertilizing())
        );
    }
    if !plant.notes.is_empty() {
        println!("  notes:      {}", plant.notes);
    }
    println!("  id:         {}", dim_id(plant.id));
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        print_empty("tasks");
        return;
    }
    let now = Utc::now();
    for task in tasks {
        let check = if task.is_completed { "[x]".green() } else { "[ ]".normal() };
        let due = short_date(task.due_date);
        let due = if task.is_overdue(now) {
            due.red()
        } else if task.is_expiring_soon(now) {
            due.yellow()
        } else {
            due.normal()
        };
        println!("{check} {} {} due {due} {}", badge(task.task_type), task.title, dim_id(task.id));
        if !task.required_items.is_empty() {
            println!("      needs: {}", task.required_items.join(", "));
        }
    }
}

fn print_due(vm: &PlantViewModel) {
    let now = Utc::now();
    let thirsty = vm.plants_needing_water(now);
    println!("{}", "Needs water".bold());
    print_plants(&thirsty);

    println!("\n{}", "Overdue".bold().red());
    print_tasks(&vm.overdue_tasks(now));

    println!("\n{}", "Due within a day".bold().yellow());
    print_tasks(&vm.expiring_tasks(now));
}
