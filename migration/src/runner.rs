use colored::*;
use migration::Migrator;
use sea_orm::{Database, DbErr};
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

/// Applies every pending migration one at a time, printing a status line for each.
pub async fn run_pending_migrations(url: &str) -> Result<(), DbErr> {
    let db = Database::connect(url).await?;
    let pending = Migrator::get_pending_migrations(&db).await?;

    if pending.is_empty() {
        println!("{}", "Schema is up to date".green());
        return Ok(());
    }

    println!("Running {} migration(s)...", pending.len());
    for migration in &pending {
        let label = format!("Applying {}", migration.name().bold());
        let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
        print!("{label}{dots} ");
        let _ = io::stdout().flush();

        let start = Instant::now();
        match Migrator::up(&db, Some(1)).await {
            Ok(()) => {
                let time_str = format!("({:.2?})", start.elapsed()).dimmed();
                println!("{} {}", "done".green(), time_str);
            }
            Err(e) => {
                println!("{}", "failed".red());
                return Err(e);
            }
        }
    }
    Ok(())
}
