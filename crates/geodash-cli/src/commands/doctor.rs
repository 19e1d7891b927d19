//! Startup diagnostics: everything the portals will fail fast on, checked
//! from the terminal with a per-view resolution report.

use anyhow::Result;
use console::style;
use std::path::Path;

use geodash_core::config::PortalConfig;
use geodash_core::formats::{read_metric_catalog, read_reference_means};
use geodash_core::models::Role;
use geodash_core::session::SessionContext;
use geodash_core::view::DashboardView;
use geodash_store::sqlite::SqliteStore;

use crate::cli::DoctorArgs;

pub async fn execute(config_path: &Path, args: DoctorArgs) -> Result<()> {
    println!("\n{}", style("GeoDash Health Check").bold().underlined());
    println!("{}", style("═".repeat(60)).dim());
    println!();

    let mut checks_passed = 0;
    let mut total_checks = 0;

    // Config
    total_checks += 1;
    let portal = match PortalConfig::load(config_path) {
        Ok(portal) => {
            println!(
                "{} Config: {} ({} views)",
                style("✓").green(),
                config_path.display(),
                portal.views.len()
            );
            checks_passed += 1;
            portal
        }
        Err(e) => {
            println!("{} Config: {}", style("✗").red(), e);
            println!("\n{}/{} checks passed", checks_passed, total_checks);
            return Ok(());
        }
    };

    // Data directory
    total_checks += 1;
    if portal.data_dir.is_dir() {
        println!("{} Data directory: {}", style("✓").green(), portal.data_dir.display());
        checks_passed += 1;
    } else {
        println!(
            "{} Data directory: {} not found",
            style("✗").red(),
            portal.data_dir.display()
        );
    }

    // Catalog
    total_checks += 1;
    let catalog = match read_metric_catalog(&portal.catalog_path()) {
        Ok(catalog) => {
            println!("{} Metric catalog: {} metrics", style("✓").green(), catalog.len());
            checks_passed += 1;
            Some(catalog)
        }
        Err(e) => {
            println!("{} Metric catalog: {}", style("✗").red(), e);
            None
        }
    };

    // Means
    total_checks += 1;
    match read_reference_means(&portal.means_path()) {
        Ok(means) => {
            println!("{} Reference means: {} metrics", style("✓").green(), means.len());
            checks_passed += 1;
        }
        Err(e) => {
            println!("{} Reference means: {} (charts render without lines)", style("⚠").yellow(), e);
        }
    }

    // Views
    if let Some(catalog) = &catalog {
        let session = SessionContext::new("doctor", Role::Admin);
        for view_config in &portal.views {
            total_checks += 1;
            match DashboardView::resolve(&portal, view_config, catalog, &session) {
                Ok(view) => {
                    println!(
                        "{} View '{}': {} metrics resolved, {} unresolved",
                        style("✓").green(),
                        view_config.slug,
                        view.metrics.available.len(),
                        view.metrics.unresolved.len()
                    );
                    checks_passed += 1;

                    if args.verbose {
                        for metric in &view.metrics.available {
                            println!("    {} → {}", metric.code, metric.column);
                        }
                        for code in &view.metrics.unresolved {
                            println!("    {} {} unresolved", style("⚠").yellow(), code);
                        }
                    }
                }
                Err(e) => {
                    println!("{} View '{}': {}", style("✗").red(), view_config.slug, e);
                }
            }

            // Overlays are omitted at render time, so a missing one is a
            // warning here, not a failure.
            for overlay in &view_config.overlays {
                let path = portal.data_path(&overlay.file);
                if !path.exists() {
                    println!(
                        "  {} Overlay '{}' missing: {}",
                        style("⚠").yellow(),
                        overlay.name,
                        path.display()
                    );
                }
            }
        }
    }

    // Database
    total_checks += 1;
    match SqliteStore::connect(&portal.database).await {
        Ok(_) => {
            println!("{} Database: {}", style("✓").green(), portal.database.display());
            checks_passed += 1;
        }
        Err(e) => {
            println!("{} Database: {}", style("✗").red(), e);
            println!("  → Run: geodash db init");
        }
    }

    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}/{} checks passed", checks_passed, total_checks);

    Ok(())
}
