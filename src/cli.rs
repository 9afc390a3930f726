use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use homeshelf::config::DATA_DIR_ENV;
use homeshelf::metadata::{PKG_DESCRIPTION, PKG_NAME, PKG_VERSION};
use homeshelf::query::SortMode;

#[derive(Parser, Debug, Clone)]
#[command(name = PKG_NAME)]
#[command(version = PKG_VERSION)]
#[command(about = PKG_DESCRIPTION, long_about = None)]
pub struct Cli {
    /// Directory holding the JSON collections
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Plant care tracker
    #[command(subcommand)]
    Plants(PlantCommand),
    /// Cosmetics organizer
    #[command(subcommand)]
    Cosmetics(CosmeticsCommand),
    /// Craft idea tracker
    #[command(subcommand)]
    Crafts(CraftCommand),
    /// Show or edit settings.json
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information
    Version,
}

/// Search, filter and sort flags shared by every list command.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Free-text search (case and accent insensitive)
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Only show this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// name, category, date or secondary (brand, species, unit, source)
    #[arg(short, long)]
    pub sort: Option<SortMode>,

    /// Show archived (or completed) records instead of active ones
    #[arg(long, conflicts_with = "all")]
    pub archived: bool,

    /// Show archived and active records together
    #[arg(long)]
    pub all: bool,

    /// Only favorites
    #[arg(long)]
    pub favorites: bool,
}

#[derive(Args, Debug, Clone)]
pub struct IdArg {
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// Plants

#[derive(Subcommand, Debug, Clone)]
pub enum PlantCommand {
    /// List plants
    List(ListArgs),
    /// Show one plant with its tasks
    Show(IdArg),
    /// Add a plant
    Add(PlantAddArgs),
    /// Edit a plant
    Update(PlantUpdateArgs),
    /// Record a watering
    Water(IdArg),
    /// Record a fertilizing
    Fertilize(IdArg),
    /// Toggle favorite
    Favorite(IdArg),
    /// Move to the archive
    Archive(IdArg),
    /// Bring back from the archive
    Restore(IdArg),
    /// Delete permanently
    Delete(DeleteArgs),
    /// Plants needing water plus overdue and expiring tasks
    Due,
    /// Care tasks
    #[command(subcommand)]
    Tasks(TaskCommand),
    /// Care guides
    #[command(subcommand)]
    Guides(GuideCommand),
}

#[derive(Args, Debug, Clone)]
pub struct PlantAddArgs {
    pub name: String,

    #[arg(short, long, default_value = "indoor")]
    pub category: String,

    #[arg(long, default_value = "")]
    pub species: String,

    #[arg(long, default_value = "")]
    pub location: String,

    #[arg(long, default_value = "")]
    pub notes: String,

    /// Days between waterings
    #[arg(long, value_parser = care_interval())]
    pub water_every: Option<u32>,

    /// Days between fertilizings
    #[arg(long, value_parser = care_interval())]
    pub fertilize_every: Option<u32>,

    /// low, medium, bright or direct
    #[arg(long)]
    pub sunlight: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PlantUpdateArgs {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub category: Option<String>,

    #[arg(long)]
    pub species: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long, value_parser = care_interval())]
    pub water_every: Option<u32>,
}

/// Care intervals in days, capped at a century.
fn care_interval() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=36500)
}

#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommand {
    /// List tasks (--archived shows completed ones)
    List(ListArgs),
    /// Add a task
    Add(TaskAddArgs),
    /// Toggle completion
    Toggle(IdArg),
    /// Delete permanently
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TaskAddArgs {
    pub title: String,

    /// watering, fertilizing, pruning, repotting, pestcontrol or other
    #[arg(short = 't', long = "type", default_value = "watering")]
    pub task_type: String,

    /// Plant the task belongs to
    #[arg(long)]
    pub plant: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Item needed for the task; repeatable
    #[arg(long = "item")]
    pub items: Vec<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum GuideCommand {
    /// List care guides
    List(ListArgs),
    /// Add a care guide
    Add(GuideAddArgs),
    /// Delete permanently
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GuideAddArgs {
    pub title: String,

    #[arg(short, long, default_value = "indoor")]
    pub category: String,

    #[arg(long, default_value = "")]
    pub summary: String,

    /// One step; repeatable
    #[arg(long = "step")]
    pub steps: Vec<String>,
}

// Cosmetics

#[derive(Subcommand, Debug, Clone)]
pub enum CosmeticsCommand {
    /// Storage locations
    #[command(subcommand)]
    Locations(LocationCommand),
    /// List products across all locations, or inside one
    List(ProductListArgs),
    /// Show one product
    Show(IdArg),
    /// Add a product to a location
    Add(ProductAddArgs),
    /// Edit a product
    Update(ProductUpdateArgs),
    /// Toggle favorite
    Favorite(IdArg),
    /// Record one use
    Used(IdArg),
    /// Move a product to another location
    Move(MoveArgs),
    /// Delete permanently
    Delete(DeleteArgs),
    /// Expired products and those expiring soon
    Expiring,
    /// Print every location with its products as JSON
    Export,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LocationCommand {
    /// List locations
    List {
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Add a location
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Rename a location
    Rename {
        id: String,
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a location and every product in it
    Delete(DeleteArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ProductListArgs {
    /// Restrict to one location
    #[arg(long)]
    pub location: Option<String>,

    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ProductAddArgs {
    /// Location id
    pub location: String,

    pub name: String,

    /// skincare, makeup, haircare, fragrance, bodycare, nails or tools
    #[arg(short, long)]
    pub category: String,

    #[arg(long, default_value = "")]
    pub brand: String,

    /// Expiration date (YYYY-MM-DD)
    #[arg(long)]
    pub expires: Option<String>,

    /// Date opened (YYYY-MM-DD)
    #[arg(long)]
    pub opened: Option<String>,

    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Args, Debug, Clone)]
pub struct ProductUpdateArgs {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub category: Option<String>,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub expires: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct MoveArgs {
    pub id: String,
    /// Target location id
    pub location: String,
}

// Crafts

#[derive(Subcommand, Debug, Clone)]
pub enum CraftCommand {
    /// Craft ideas
    #[command(subcommand)]
    Ideas(IdeaCommand),
    /// Free-form notes
    #[command(subcommand)]
    Notes(NoteCommand),
    /// Materials stash
    #[command(subcommand)]
    Materials(MaterialCommand),
    /// Saved inspirations
    #[command(subcommand)]
    Inspirations(InspirationCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum IdeaCommand {
    /// List ideas
    List(ListArgs),
    /// Show one idea with steps and notes
    Show(IdArg),
    /// Add an idea
    Add(IdeaAddArgs),
    /// Edit an idea
    Update(IdeaUpdateArgs),
    /// Toggle favorite
    Favorite(IdArg),
    /// Move to the archive
    Archive(IdArg),
    /// Bring back from the archive
    Restore(IdArg),
    /// Delete permanently
    Delete(DeleteArgs),
    /// Append a step
    AddStep { id: String, text: String },
    /// Toggle a step's completion
    ToggleStep { id: String, step: String },
    /// Remove a step
    RemoveStep { id: String, step: String },
}

#[derive(Args, Debug, Clone)]
pub struct IdeaAddArgs {
    pub title: String,

    #[arg(short = 't', long = "type", default_value = "other")]
    pub craft_type: String,

    #[arg(long, default_value = "beginner")]
    pub difficulty: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// One step; repeatable
    #[arg(long = "step")]
    pub steps: Vec<String>,

    /// One material; repeatable
    #[arg(long = "material")]
    pub materials: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct IdeaUpdateArgs {
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(short = 't', long = "type")]
    pub craft_type: Option<String>,

    #[arg(long)]
    pub difficulty: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum NoteCommand {
    /// Search notes, most recently edited first
    List {
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Add a note
    Add {
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Link the note to an idea
        #[arg(long)]
        idea: Option<String>,
    },
    /// Replace a note's content
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete permanently
    Delete(DeleteArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum MaterialCommand {
    /// List materials
    List(ListArgs),
    /// Add a material
    Add {
        name: String,
        #[arg(short = 't', long = "type", default_value = "other")]
        craft_type: String,
        #[arg(long, default_value_t = 0)]
        quantity: u32,
        #[arg(long, default_value = "")]
        unit: String,
    },
    /// Add to (or with a negative value, take from) the stock
    Adjust {
        id: String,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Delete permanently
    Delete(DeleteArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum InspirationCommand {
    /// List inspirations
    List(ListArgs),
    /// Save an inspiration
    Add {
        title: String,
        #[arg(short = 't', long = "type", default_value = "other")]
        craft_type: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Toggle favorite
    Favorite(IdArg),
    /// Delete permanently
    Delete(DeleteArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the resolved settings
    Show,
    /// Edit settings interactively
    Edit,
}
