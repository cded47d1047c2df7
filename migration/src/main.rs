use colored::*;
use std::{fs, io, path::Path};
use util::config;

mod runner;

/// `migration [up|fresh|clean]` against the configured SQLite file.
#[tokio::main]
async fn main() {
    let db_path = config::database_path();
    let url = format!("sqlite://{db_path}?mode=rwc");

    let result = match std::env::args().nth(1).as_deref() {
        Some("clean") => remove_db_file(&db_path).map_err(|e| e.to_string()),
        Some("fresh") => match remove_db_file(&db_path).and_then(|_| create_db_dir(&db_path)) {
            Ok(()) => runner::run_pending_migrations(&url)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        },
        _ => match create_db_dir(&db_path) {
            Ok(()) => runner::run_pending_migrations(&url)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        },
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn remove_db_file(path: &str) -> io::Result<()> {
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path)?;
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
    Ok(())
}

fn create_db_dir(path: &str) -> io::Result<()> {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
