//! Simple validation example: validate a harness file and print the findings.

use harnessguard::prelude::*;
use std::path::Path;

fn main() -> Result<(), HarnessGuardError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/valid_harness.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_validation [path/to/harness.json] [settings.json]");
        std::process::exit(1);
    }

    let settings_path = std::env::args().nth(2);
    let settings = HarnessGuardCore::load_settings(settings_path.as_deref().map(Path::new))?;

    let result = HarnessGuardCore::validate_file(path, &settings, &ValidationOptions::default())?;

    println!("Validation results for: {} ({})", result.file.display(), result.harness_name);
    println!("Total findings: {}", result.total_errors());
    println!();

    for error_type in ErrorType::ALL {
        let findings: Vec<_> = result
            .errors
            .iter()
            .filter(|e| e.error_type == error_type)
            .collect();
        if findings.is_empty() {
            continue;
        }
        println!("{} ({}):", error_type, findings.len());
        for error in findings {
            println!("  - {}", error.message);
        }
    }

    if !result.is_valid() {
        println!("\nValidation failed: procurement export is blocked.");
        std::process::exit(1);
    }

    println!("\nValidation passed.");
    Ok(())
}
