use chrono::Utc;
use colored::Colorize;

use homeshelf::config::Settings;
use homeshelf::cosmetics::{CosmeticsViewModel, Product, ProductCategory, StorageLocation};
use homeshelf::error::AppResult;
use homeshelf::query::ListQuery;
use homeshelf::storage::SharedStore;

use super::{
    badge, badge_with_icon, build_query, confirm, dim_id, done, not_found, parse_category,
    parse_date, parse_id, print_empty, required, short_date, star,
};
use crate::cli::{CosmeticsCommand, LocationCommand, ProductAddArgs, ProductUpdateArgs};

pub fn run(command: CosmeticsCommand, store: SharedStore, settings: &Settings) -> AppResult<()> {
    let mut vm = CosmeticsViewModel::new(store);
    match command {
        CosmeticsCommand::Locations(command) => run_locations(&mut vm, command)?,
        CosmeticsCommand::List(args) => {
            let query: ListQuery<ProductCategory> = build_query(&args.list, settings.default_sort)?;
            let products = match &args.location {
                Some(raw) => {
                    let location_id = parse_id(raw)?;
                    if vm.location(location_id).is_none() {
                        return Err(not_found("location", location_id));
                    }
                    vm.products_in(location_id, &query)
                }
                None => vm.search_products(&query),
            };
            print_products(&vm, &products);
        }
        CosmeticsCommand::Show(arg) => {
            let id = parse_id(&arg.id)?;
            let product = vm.product(id).ok_or_else(|| not_found("product", id))?;
            print_product_detail(&vm, &product);
        }
        CosmeticsCommand::Add(args) => {
            let location_id = parse_id(&args.location)?;
            let product = new_product(&args)?;
            let product = vm
                .add_product(location_id, product)
                .ok_or_else(|| not_found("location", location_id))?;
            done(format!("Added {} {}", product.name.bold(), dim_id(product.id)));
        }
        CosmeticsCommand::Update(args) => {
            let id = parse_id(&args.id)?;
            let product = vm.product(id).ok_or_else(|| not_found("product", id))?;
            vm.update_product(apply_update(product, args)?);
            done("Product updated");
        }
        CosmeticsCommand::Favorite(arg) => {
            let id = parse_id(&arg.id)?;
            if !vm.toggle_favorite(id) {
                return Err(not_found("product", id));
            }
            done("Favorite toggled");
        }
        CosmeticsCommand::Used(arg) => {
            let id = parse_id(&arg.id)?;
            if !vm.mark_used(id) {
                return Err(not_found("product", id));
            }
            done("Marked as used");
        }
        CosmeticsCommand::Move(args) => {
            let id = parse_id(&args.id)?;
            let target = parse_id(&args.location)?;
            if vm.move_product(id, target) {
                done("Moved");
            } else {
                print_empty("change (unknown product or location, or already there)");
            }
        }
        CosmeticsCommand::Delete(args) => {
            let id = parse_id(&args.id)?;
            let product = vm.product(id).ok_or_else(|| not_found("product", id))?;
            if confirm(&format!("Delete {} permanently?", product.name), args.yes)? {
                vm.delete_product(id);
                done("Deleted");
            }
        }
        CosmeticsCommand::Expiring => {
            let now = Utc::now();
            println!("{}", "Expired".bold().red());
            print_products(&vm, &vm.expired_products(now));
            println!("\n{}", "Expiring soon".bold().yellow());
            print_products(&vm, &vm.expiring_soon(now));
        }
        CosmeticsCommand::Export => println!("{}", vm.export_json()?),
    }
    Ok(())
}

fn run_locations(vm: &mut CosmeticsViewModel, command: LocationCommand) -> AppResult<()> {
    match command {
        LocationCommand::List { query } => {
            let locations = vm.search_locations(&query);
            if locations.is_empty() {
                print_empty("storage locations");
            }
            for location in locations {
                println!(
                    "{} {} {}",
                    location.name.bold(),
                    format!("({} products)", location.products.len()).dimmed(),
                    dim_id(location.id)
                );
                if !location.description.is_empty() {
                    println!("    {}", location.description);
                }
            }
        }
        LocationCommand::Add { name, description } => {
            let location =
                StorageLocation::new(required("name", &name)?).with_description(description);
            let location = vm.add_location(location);
            done(format!("Added location {} {}", location.name.bold(), dim_id(location.id)));
        }
        LocationCommand::Rename { id, name, description } => {
            let id = parse_id(&id)?;
            let current = vm.location(id).ok_or_else(|| not_found("location", id))?;
            let description = description.unwrap_or(current.description);
            vm.update_location(id, required("name", &name)?, description);
            done("Location updated");
        }
        LocationCommand::Delete(args) => {
            let id = parse_id(&args.id)?;
            let location = vm.location(id).ok_or_else(|| not_found("location", id))?;
            let prompt = format!(
                "Delete {} and its {} products permanently?",
                location.name,
                location.products.len()
            );
            if confirm(&prompt, args.yes)? {
                vm.delete_location(id);
                done("Deleted");
            }
        }
    }
    Ok(())
}

fn new_product(args: &ProductAddArgs) -> AppResult<Product> {
    let mut product = Product::new(required("name", &args.name)?, parse_category(&args.category)?)
        .with_brand(args.brand.trim());
    if let Some(raw) = &args.expires {
        product = product.expires(parse_date(raw)?);
    }
    if let Some(raw) = &args.opened {
        product.opened_date = Some(parse_date(raw)?);
    }
    product.notes = args.notes.clone();
    Ok(product)
}

fn apply_update(mut product: Product, args: ProductUpdateArgs) -> AppResult<Product> {
    if let Some(name) = &args.name {
        product.name = required("name", name)?;
    }
    if let Some(category) = &args.category {
        product.category = parse_category(category)?;
    }
    if let Some(brand) = args.brand {
        product.brand = brand;
    }
    if let Some(raw) = &args.expires {
        product.expiration_date = Some(parse_date(raw)?);
    }
    if let Some(notes) = args.notes {
        product.notes = notes;
    }
    Ok(product)
}

fn location_name(vm: &CosmeticsViewModel, product: &Product) -> String {
    vm.location(product.location_id)
        .map(|l| l.name)
        .unwrap_or_default()
}

fn print_products(vm: &CosmeticsViewModel, products: &[Product]) {
    if products.is_empty() {
        print_empty("products");
        return;
    }
    let now = Utc::now();
    for product in products {
        let expiry = short_date(product.expiration_date);
        let expiry = if product.is_expired(now) {
            expiry.red()
        } else if product.is_expiring_soon(now) {
            expiry.yellow()
        } else {
            expiry.normal()
        };
        let brand = if product.brand.is_empty() {
            String::new()
        } else {
            format!("{} ", product.brand.italic())
        };
        println!(
            "{} {} {}{} exp {expiry} @ {} {}",
            star(product.is_favorite).yellow(),
            badge(product.category),
            brand,
            product.name.bold(),
            location_name(vm, product),
            dim_id(product.id)
        );
    }
}

fn print_product_detail(vm: &CosmeticsViewModel, product: &Product) {
    println!("{} {}", badge_with_icon(product.category), product.name.bold());
    if !product.brand.is_empty() {
        println!("  brand:     {}", product.brand);
    }
    println!("  location:  {}", location_name(vm, product));
    println!("  opened:    {}", short_date(product.opened_date));
    println!("  expires:   {}", short_date(product.expiration_date));
    println!(
        "  used:      {} times, last {}",
        product.usage_count,
        short_date(product.last_used)
    );
    if !product.notes.is_empty() {
        println!("  notes:     {}", product.notes);
    }
    println!("  id:        {}", dim_id(product.id));
}
