//! Command handlers. Each one builds a view-model over the shared store,
//! runs a single query or mutation and prints the result.

pub mod config;
pub mod cosmetics;
pub mod crafts;
pub mod plants;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use colored::{ColoredString, Colorize};
use dialoguer::Confirm;

use homeshelf::category::Category;
use homeshelf::error::{AppError, AppResult};
use homeshelf::query::{ArchiveFilter, ListQuery, SortMode};
use homeshelf::record::RecordId;

use crate::cli::ListArgs;

pub fn parse_id(raw: &str) -> AppResult<RecordId> {
    raw.trim()
        .parse::<RecordId>()
        .map_err(|_| AppError::InvalidInput(format!("'{raw}' is not a valid id")))
}

pub fn parse_category<C>(raw: &str) -> AppResult<C>
where
    C: Category + std::str::FromStr<Err = String>,
{
    raw.parse::<C>().map_err(AppError::InvalidInput)
}

/// Accepts `YYYY-MM-DD` and returns midnight UTC of that day.
pub fn parse_date(raw: &str) -> AppResult<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|err| AppError::InvalidInput(format!("bad date '{raw}': {err}")))
}

/// Rejects blank required fields and returns the trimmed value.
pub fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

pub fn not_found(kind: &str, id: RecordId) -> AppError {
    AppError::NotFound(format!("{kind} {id}"))
}

pub fn build_query<C>(args: &ListArgs, default_sort: SortMode) -> AppResult<ListQuery<C>>
where
    C: Category + std::str::FromStr<Err = String>,
{
    let archive = if args.all {
        ArchiveFilter::All
    } else if args.archived {
        ArchiveFilter::Archived
    } else {
        ArchiveFilter::Active
    };
    Ok(ListQuery {
        text: args.query.clone(),
        category: args.category.as_deref().map(parse_category::<C>).transpose()?,
        sort: args.sort.unwrap_or(default_sort),
        archive,
        favorites_only: args.favorites,
    })
}

/// Asks before a destructive action unless `yes` was given.
pub fn confirm(prompt: &str, yes: bool) -> AppResult<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

pub fn badge<C: Category>(category: C) -> ColoredString {
    format!("[{}]", category.display_name()).color(category.color())
}

/// Badge followed by the category's icon name, for detail views.
pub fn badge_with_icon<C: Category>(category: C) -> String {
    format!("{} {}", badge(category), format!("<{}>", category.icon()).dimmed())
}

pub fn star(favorite: bool) -> &'static str {
    if favorite { "★" } else { " " }
}

pub fn short_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn dim_id(id: RecordId) -> ColoredString {
    id.to_string().dimmed()
}

pub fn print_empty(what: &str) {
    println!("{}", format!("No {what}.").dimmed());
}

pub fn done(message: impl AsRef<str>) {
    println!("{} {}", "✓".green(), message.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeshelf::plants::PlantCategory;

    #[test]
    fn parse_date_is_midnight_utc() {
        let date = parse_date("2025-03-09").unwrap();
        assert_eq!(date.to_rfc3339(), "2025-03-09T00:00:00+00:00");
        assert!(parse_date("09/03/2025").is_err());
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(matches!(required("name", "   "), Err(AppError::InvalidInput(_))));
        assert_eq!(required("name", " Fern ").unwrap(), "Fern");
    }

    #[test]
    fn list_args_become_query() {
        let args = ListArgs {
            query: "fern".into(),
            category: Some("Outdoor".into()),
            archived: true,
            ..ListArgs::default()
        };
        let query: ListQuery<PlantCategory> = build_query(&args, SortMode::Date).unwrap();
        assert_eq!(query.category, Some(PlantCategory::Outdoor));
        assert_eq!(query.archive, ArchiveFilter::Archived);
        assert_eq!(query.sort, SortMode::Date);

        let bad = ListArgs {
            category: Some("moon".into()),
            ..ListArgs::default()
        };
        assert!(build_query::<PlantCategory>(&bad, SortMode::Name).is_err());
    }

    #[test]
    fn detail_badge_names_the_icon() {
        let shown = badge_with_icon(PlantCategory::Herb);
        assert!(shown.contains("[Herb]"));
        assert!(shown.contains("<leaf>"));
    }

    #[test]
    fn invalid_id_is_input_error() {
        assert!(matches!(parse_id("nope"), Err(AppError::InvalidInput(_))));
    }
}
