/// Pack Linter — validates campaign packs and reports authoring issues.
///
/// Usage: pack_linter <pack_dir_or_file> [--strict]
///
/// Validation failures are errors. Dangling choices, duplicate scene ids
/// and unreachable scenes are warnings (errors with --strict).

use campaign_engine::core::lint::lint_pack;
use campaign_engine::core::loader::{decode_document, PackLibrary};
use campaign_engine::schema::pack::CampaignPack;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: pack_linter <pack_dir_or_file> [--strict]");
        process::exit(0);
    }

    let target = Path::new(&args[1]);
    let strict = args[2..].iter().any(|a| a == "--strict");

    let paths: Vec<PathBuf> = if target.is_file() {
        vec![target.to_path_buf()]
    } else if target.is_dir() {
        match PackLibrary::new(target).scan() {
            Ok(entries) => entries.into_iter().map(|e| e.path).collect(),
            Err(e) => {
                eprintln!("ERROR: Failed to read '{}': {}", target.display(), e);
                process::exit(1);
            }
        }
    } else {
        eprintln!("ERROR: Path '{}' does not exist", target.display());
        process::exit(1);
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for path in &paths {
        let pack = match decode_document(path)
            .and_then(|doc| CampaignPack::from_value(doc).map_err(Into::into))
        {
            Ok(pack) => pack,
            Err(e) => {
                errors.push(format!("{}: {}", path.display(), e));
                continue;
            }
        };
        println!(
            "  Checked: {} ({} '{}', {} scenes)",
            path.display(),
            pack.meta.id,
            pack.meta.title,
            pack.scenes.len()
        );
        for warning in lint_pack(&pack) {
            warnings.push(format!("{}: {}", path.display(), warning));
        }
    }

    println!("\n=== Pack Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("{}: {}", if strict { "ERROR" } else { "WARNING" }, warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    let error_count = errors.len() + if strict { warnings.len() } else { 0 };
    println!(
        "\nSummary: {} packs, {} errors, {} warnings",
        paths.len(),
        error_count,
        if strict { 0 } else { warnings.len() }
    );

    process::exit(if error_count == 0 { 0 } else { 1 });
}
