use std::path::PathBuf;

use colored::Colorize;
use packwright_lib::{
    Compatibility,
    compat::{CompatFilter, classify_all, removable_incompatible},
    config::CoreConfig,
};
use serde::Serialize;
use sysexits::ExitCode;

use crate::document::{self, PackDocument};

#[derive(clap::Args, Debug, Clone)]
pub struct Args {
    /// Modpack document (TOML)
    modpack: PathBuf,

    /// Only show resources with this verdict [default: library.filter from core.toml]
    #[arg(short, long)]
    filter: Option<CompatFilter>,
}

impl Args {
    fn filter(&self, cfg: &CoreConfig) -> CompatFilter {
        self.filter.unwrap_or(cfg.library.filter)
    }
}

#[derive(Serialize)]
struct Row<'a> {
    id: &'a str,
    name: &'a str,
    enabled: bool,
    locked: bool,
    #[serde(flatten)]
    compatibility: &'a Compatibility,
}

#[derive(Serialize)]
struct Report<'a> {
    resources: Vec<Row<'a>>,
    /// Incompatible and not locked
    removable: Vec<String>,
}

pub fn handle(args: &Args, cfg: &CoreConfig, json: bool) -> ExitCode {
    let doc: PackDocument = match document::read(&args.modpack) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let target = doc.modpack.target();
    let disabled = doc.disabled();
    let locked = doc.locked();

    let classified = classify_all(doc.resources(), Some(&target), args.filter(cfg));
    let resources: Vec<_> = doc.resources().cloned().collect();
    let report = Report {
        resources: classified
            .iter()
            .map(|(resource, compatibility)| Row {
                id: &resource.id,
                name: &resource.name,
                enabled: !disabled.contains(&resource.id),
                locked: locked.contains(&resource.id),
                compatibility,
            })
            .collect(),
        removable: removable_incompatible(&resources, Some(&target), &locked)
            .into_iter()
            .map(|id| id.to_string())
            .collect(),
    };

    if json {
        return document::print_json(&report);
    }

    println!(
        "{} ({} {})",
        doc.modpack.name.bold(),
        target.minecraft_version,
        target.loader
    );
    for row in &report.resources {
        let badge = match row.compatibility {
            Compatibility::Compatible => "compatible".green(),
            Compatibility::Warning(_) => "warning".yellow(),
            Compatibility::Incompatible(_) => "incompatible".red(),
        };
        let mut flags = String::new();
        if !row.enabled {
            flags.push_str(" [disabled]");
        }
        if row.locked {
            flags.push_str(" [locked]");
        }

        match row.compatibility.reason() {
            Some(reason) => println!("* {} {badge}{flags}: {reason}", row.name),
            None => println!("* {} {badge}{flags}", row.name),
        }
    }

    if !report.removable.is_empty() {
        println!(
            "{} incompatible resources can be removed: {}",
            report.removable.len(),
            report.removable.join(", ")
        );
    }

    ExitCode::Ok
}
