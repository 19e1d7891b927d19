//! Per-view inspection: dataset columns and the metric resolution table.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;
use tabled::{Table, Tabled};

use geodash_core::config::PortalConfig;
use geodash_core::formats::read_metric_catalog;
use geodash_core::metrics::resolve_metrics;
use geodash_core::models::{Lang, MetricCatalog, MetricCode, RegionDataset, Role};
use geodash_core::session::SessionContext;

use crate::cli::InspectArgs;

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Code")]
    code: String,

    #[tabled(rename = "Label")]
    label: String,

    #[tabled(rename = "Column")]
    column: String,

    #[tabled(rename = "Direction")]
    direction: String,
}

pub fn execute(config_path: &Path, args: InspectArgs) -> Result<()> {
    let portal = PortalConfig::load(config_path).context("loading configuration")?;
    let view = portal.view(&args.view).context("unknown view")?;
    let catalog = read_metric_catalog(&portal.catalog_path()).context("loading catalog")?;

    let session = SessionContext::new("inspect", Role::Admin);
    let dataset = session
        .cache
        .get_or_load(&portal.data_path(&view.dataset))
        .context("loading dataset")?;

    println!("\n{} {}", style("View:").bold(), view.slug);
    println!("{} {}", style("Dataset:").bold(), dataset.path.display());
    println!("{} {}", style("Features:").bold(), dataset.len());

    println!("\n{}", style("Columns").bold().underlined());
    println!("{}", dataset.columns().join(", "));

    println!("\n{}", style("Metric resolution").bold().underlined());
    print_resolution(&catalog, view, &dataset);

    Ok(())
}

fn print_resolution(
    catalog: &MetricCatalog,
    view: &geodash_core::config::ViewConfig,
    dataset: &RegionDataset,
) {
    let effective: Vec<MetricCode> = if view.codes.is_empty() {
        catalog.iter().map(|info| info.code.clone()).collect()
    } else {
        view.codes.iter().map(|c| MetricCode::new(c)).collect()
    };

    match resolve_metrics(catalog, &view.aliases, dataset) {
        Ok(resolved) => {
            let rows: Vec<MetricRow> = resolved
                .available
                .iter()
                .filter(|m| effective.contains(&m.code))
                .map(|m| {
                    let info = catalog.get(&m.code);
                    MetricRow {
                        code: m.code.to_string(),
                        label: info.map(|i| i.label(Lang::Fr).to_string()).unwrap_or_default(),
                        column: m.column.clone(),
                        direction: info
                            .map(|i| format!("{:?}", i.direction))
                            .unwrap_or_default(),
                    }
                })
                .collect();
            println!("{}", Table::new(rows));

            if !resolved.unresolved.is_empty() {
                println!(
                    "\n{} unresolved: {}",
                    style("⚠").yellow(),
                    resolved
                        .unresolved
                        .iter()
                        .map(|c| c.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
        Err(e) => {
            println!("{} {}", style("✗").red(), e);
        }
    }
}
