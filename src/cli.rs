use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::db::job_repository::JobRepository;
use crate::db::location_repository::LocationRepository;
use crate::db::organization_repository::OrganizationRepository;
use crate::db::user_repository::UserRepository;

#[derive(Parser)]
#[command(name = "job-tracker", about = "Volunteer hours tracking service", version)]
pub struct Cli {
    /// Run an admin command instead of starting the server
    #[command(subcommand)]
    pub command: Option<AdminCommand>,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Print table counts and the most recently recorded jobs, then exit
    CheckDb,

    /// Report jobs whose location no longer exists; optionally delete or
    /// reassign them
    CleanupOrphanedJobs {
        /// Delete the orphaned jobs
        #[arg(long, conflicts_with = "reassign")]
        delete: bool,

        /// Reassign the orphaned jobs to this location
        #[arg(long, value_name = "LOCATION_ID")]
        reassign: Option<Uuid>,
    },
}

pub async fn run(pool: &Pool<Postgres>, command: AdminCommand) -> Result<(), sqlx::Error> {
    match command {
        AdminCommand::CheckDb => check_db(pool).await,
        AdminCommand::CleanupOrphanedJobs { delete, reassign } => {
            cleanup_orphaned_jobs(pool, delete, reassign).await
        }
    }
}

async fn check_db(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    println!("users:         {}", UserRepository::count(pool).await?);
    println!("organizations: {}", OrganizationRepository::count(pool).await?);
    println!("locations:     {}", LocationRepository::count(pool).await?);
    println!("jobs:          {}", JobRepository::count(pool).await?);

    let latest = JobRepository::latest_titles(pool, 5).await?;
    if !latest.is_empty() {
        println!("\nMost recently recorded jobs:");
        for (title, date) in latest {
            match date {
                Some(d) => println!("- {} ({})", title, d.format("%Y-%m-%d")),
                None => println!("- {} (no date)", title),
            }
        }
    }
    Ok(())
}

async fn cleanup_orphaned_jobs(
    pool: &Pool<Postgres>,
    delete: bool,
    reassign: Option<Uuid>,
) -> Result<(), sqlx::Error> {
    let orphans = JobRepository::find_orphaned(pool).await?;
    let total = JobRepository::count(pool).await?;

    println!(
        "Found {} jobs with missing locations out of {} total jobs.",
        orphans.len(),
        total
    );
    if orphans.is_empty() {
        println!("No cleanup needed. All jobs have valid locations.");
        return Ok(());
    }

    println!("\nThe following jobs have missing locations:");
    for job in &orphans {
        println!(
            "- id: {}, title: {} (was location {})",
            job.id, job.title, job.location_id
        );
    }

    let ids: Vec<Uuid> = orphans.iter().map(|j| j.id).collect();

    if delete {
        let removed = JobRepository::delete_by_ids(pool, &ids).await?;
        println!("\nDeleted {} jobs with missing locations.", removed);
    } else if let Some(location_id) = reassign {
        match LocationRepository::find_by_id(pool, location_id).await? {
            Some(location) => {
                let moved =
                    JobRepository::reassign_location(pool, &ids, location_id, Utc::now()).await?;
                println!("\nReassigned {} jobs to location: {}", moved, location.name);
            }
            None => {
                println!(
                    "\nLocation {} not found. No changes were made.",
                    location_id
                );
            }
        }
    } else {
        println!("\nNo changes were made. Re-run with --delete or --reassign <LOCATION_ID>.");
    }
    Ok(())
}
