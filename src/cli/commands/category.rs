use crate::cli::commands::open_db;
use crate::cli::parser::{CategoryAction, Commands};
use crate::config::Config;
use crate::db::queries::{
    find_running_interval, insert_category, list_categories, rename_category,
    set_category_colour, set_category_visibility, soft_delete_category,
};
use crate::errors::{AppError, AppResult};
use crate::models::category::{PALETTE, TimeBox, Visibility, find_box, parse_colour};
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{colorize_running, dim};
use crate::utils::formatting::{italic, swatch};
use crate::utils::table::Table;
use rusqlite::Connection;
use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

/// Resolve a non-deleted time box by id or name.
fn resolve_box(conn: &Connection, reference: &str) -> AppResult<TimeBox> {
    let boxes = list_categories(conn, false)?;
    find_box(&boxes, reference)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("time box '{reference}'")))
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Category { action } = cmd else {
        return Ok(());
    };
    let pool = open_db(cfg)?;
    let conn = &pool.conn;

    match action {
        CategoryAction::List { all } => print_boxes(conn, *all)?,

        CategoryAction::Add { name, colour } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Precondition("time box name cannot be empty".into()));
            }
            let boxes = list_categories(conn, true)?;
            if find_box(&boxes, name).is_some_and(|b| !b.is_deleted()) {
                return Err(AppError::Duplicate(name.to_string()));
            }
            let colour = match colour {
                Some(c) => parse_colour(c)?,
                None => PALETTE[boxes.len() % PALETTE.len()].to_string(),
            };
            let tb = TimeBox::new(name, &colour);
            insert_category(conn, &tb)?;
            success(format!("Time box {} created", swatch(&tb.colour, &tb.name)));
        }

        CategoryAction::Rename { reference, name } => {
            let tb = resolve_box(conn, reference)?;
            let name = name.trim();
            if name.is_empty() {
                return Err(AppError::Precondition("time box name cannot be empty".into()));
            }
            let boxes = list_categories(conn, false)?;
            if boxes.iter().any(|b| b.id != tb.id && b.name.eq_ignore_ascii_case(name)) {
                return Err(AppError::Duplicate(name.to_string()));
            }
            rename_category(conn, &tb.id, name)?;
            success(format!("Renamed '{}' to '{name}'", tb.name));
        }

        CategoryAction::Colour { reference, colour } => {
            let tb = resolve_box(conn, reference)?;
            let colour = parse_colour(colour)?;
            set_category_colour(conn, &tb.id, &colour)?;
            success(format!("Colour of {} set to {colour}", swatch(&colour, &tb.name)));
        }

        CategoryAction::Hide { reference } => {
            let tb = resolve_box(conn, reference)?;
            set_category_visibility(conn, &tb.id, Visibility::Hidden)?;
            success(format!("'{}' hidden", tb.name));
        }

        CategoryAction::Show { reference } => {
            let tb = resolve_box(conn, reference)?;
            set_category_visibility(conn, &tb.id, Visibility::Visible)?;
            success(format!("'{}' visible again", tb.name));
        }

        CategoryAction::Delete { reference, yes } => {
            let tb = resolve_box(conn, reference)?;
            let prompt = format!(
                "Delete time box '{}'? Recorded time keeps its name but the box can no longer be started.",
                tb.name
            );
            if !*yes && !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }
            soft_delete_category(conn, &tb.id)?;
            success(format!("'{}' deleted", tb.name));
        }
    }

    Ok(())
}

fn print_boxes(conn: &Connection, include_deleted: bool) -> AppResult<()> {
    let boxes = list_categories(conn, include_deleted)?;
    if boxes.is_empty() {
        info("No time boxes.");
        return Ok(());
    }

    let running = find_running_interval(conn)?.map(|i| i.category_id);

    let mut table = Table::new(["#", "Time box", "Colour", "State", "Id"]);
    for (i, b) in boxes.iter().enumerate() {
        let is_running = running.as_deref() == Some(b.id.as_str());
        let state = if b.is_deleted() {
            italic("deleted")
        } else if b.is_hidden() {
            dim("hidden")
        } else if is_running {
            colorize_running("running", true)
        } else {
            String::new()
        };
        table.add_row(vec![
            (i + 1).to_string(),
            swatch(&b.colour, &b.name),
            b.colour.clone(),
            state,
            b.id.clone(),
        ]);
    }
    print!("{}", table.render());
    Ok(())
}
