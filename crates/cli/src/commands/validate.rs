use folio_kit_validator::validate_site;
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let report = validate_site(&path);

    for info in &report.info {
        println!("✓ {}", info);
    }
    for warning in &report.warnings {
        println!("⚠ {}", warning);
    }
    for error in &report.errors {
        eprintln!("✗ {}", error);
    }

    if !report.is_ok() {
        anyhow::bail!("Validation failed with {} error(s)", report.errors.len());
    }

    println!(
        "\nSite is valid ({} warning(s))",
        report.warnings.len()
    );

    Ok(())
}
