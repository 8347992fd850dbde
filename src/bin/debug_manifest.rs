// Debug script to show a directory manifest and, given a second directory, the sync plan

use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;

use folder_sync::operations::{Differ, Manifest, ScanOptions, Scanner};
use folder_sync::render::format_time;

fn main() -> Result<()> {
    let mut args = env::args_os().skip(1).map(PathBuf::from);
    let Some(first) = args.next() else {
        bail!("usage: debug-manifest DIR [DIR2]");
    };
    let second = args.next();

    let scanner = Scanner::new(ScanOptions::default());
    let first_manifest = scanner.scan(&first)?;
    print_manifest("DIR 1", &first_manifest);

    let Some(second) = second else {
        return Ok(());
    };
    let second_manifest = scanner.scan(&second)?;
    print_manifest("DIR 2", &second_manifest);

    let differ = Differ::default();
    let operations = differ.diff(&first_manifest, &second_manifest);

    println!("=== PLAN ({} operations) ===", operations.len());
    for (index, operation) in operations.iter().enumerate() {
        println!(
            "  [{}] {} {} -> {}",
            index + 1,
            operation.action(),
            operation.source().display(),
            operation.destination().display()
        );
    }

    Ok(())
}

fn print_manifest(label: &str, manifest: &Manifest) {
    println!("=== {label}: {} ===", manifest.root().display());
    println!("Files: {}", manifest.len());
    for record in manifest.iter() {
        println!(
            "  {}  {:.3}  {}",
            format_time(record.mod_time),
            record.mod_time,
            record.relative_path
        );
    }

    if !manifest.skipped().is_empty() {
        println!("Skipped:");
        for path in manifest.skipped() {
            println!("  {}", path.display());
        }
    }
    println!();
}
