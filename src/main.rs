// ABOUTME: CLI entrypoint for the marmalade command
// ABOUTME: Handles error exit codes and command dispatch

use clap::Parser;
use marmalade::{
    api::NotionClient,
    auth::resolve_credentials,
    clean::clean_all,
    cli::{Cli, Commands},
    sync::sync_all,
    Error, Result,
};
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    if let Err(e) = run() {
        eprintln!("marmalade: [E{}] {}", e.exit_code(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let creds = resolve_credentials(cli.token.clone(), cli.root_page.clone())?;
    let mut client = NotionClient::new(creds.token, Some(cli.api_base.clone()))?;

    if cli.no_throttle {
        client = client.disable_throttle();
    } else if let Some((min, max)) = cli.throttle_ms {
        client = client.with_throttle(min, max);
    }

    match cli.command() {
        Commands::Sync { dir } => {
            let source = dir.unwrap_or_else(|| PathBuf::from("."));
            if !source.is_dir() {
                return Err(Error::Filesystem(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("source directory not found: {}", source.display()),
                )));
            }

            let started = Instant::now();
            let stats = sync_all(&client, &source, &creds.root_page_id)?;

            println!("sync complete in {:.2}s", started.elapsed().as_secs_f64());
            println!("  files processed: {}", stats.processed);
            println!("  pages created:   {}", stats.created);
            println!("  pages skipped:   {}", stats.skipped);
            println!("  folders created: {}", stats.folders_created);
            println!("  errors:          {}", stats.errors);

            if stats.errors > 0 {
                return Err(Error::Sync(format!("{} page(s) failed", stats.errors)));
            }
        }
        Commands::Clean { yes } => {
            println!("This will delete ALL child pages under {}", creds.root_page_id);
            if !yes {
                println!("starting in 3 seconds (ctrl-c to abort, --yes to skip)...");
                std::thread::sleep(std::time::Duration::from_secs(3));
            }

            let started = Instant::now();
            let deleted = clean_all(&client, &creds.root_page_id)?;
            println!(
                "cleanup complete in {:.2}s, {} page(s) deleted",
                started.elapsed().as_secs_f64(),
                deleted
            );
        }
    }

    Ok(())
}
