use std::path::{Path, PathBuf};

use colored::Colorize;
use packwright_lib::{SyncMode, SyncPlan, SyncStatus, config::CoreConfig, sync::reconcile};
use sysexits::ExitCode;

use crate::document::{self, InstanceDocument, PackDocument};

#[derive(clap::Args, Debug, Clone)]
pub struct PlanArgs {
    modpack: PathBuf,
    instance: PathBuf,

    /// overwrite, new_only or skip [default: sync.default_mode from core.toml]
    #[arg(short, long)]
    mode: Option<SyncMode>,
}

impl PlanArgs {
    fn mode(&self, cfg: &CoreConfig) -> SyncMode {
        self.mode.unwrap_or(cfg.sync.default_mode)
    }
}

fn compute(modpack: &Path, instance: &Path) -> Result<SyncStatus, ExitCode> {
    let pack: PackDocument = document::read(modpack)?;
    let instance: InstanceDocument = document::read(instance)?;

    Ok(reconcile(&pack.manifest(), &instance.snapshot()))
}

pub fn status(modpack: &Path, instance: &Path, json: bool) -> ExitCode {
    let status = match compute(modpack, instance) {
        Ok(status) => status,
        Err(code) => return code,
    };

    if json {
        return document::print_json(&status);
    }

    if status.needs_sync {
        println!("{}", status.summary().yellow());
    } else {
        println!("{}", status.summary().green());
    }
    for diff in &status.missing_in_instance {
        println!("  {} {} ({})", "+".green(), diff.filename, diff.content_type);
    }
    for diff in status.removal_candidates() {
        println!("  {} {} ({})", "-".red(), diff.filename, diff.content_type);
    }
    for diff in status.preserved_extras() {
        println!("  {} {} ({}, kept)", "=".dimmed(), diff.filename, diff.content_type);
    }
    for mismatch in &status.disabled_mismatch {
        println!("  {} {}: {}", "~".yellow(), mismatch.filename, mismatch.issue);
    }
    if status.config_differences > 0 {
        println!("  {} modified config files", status.config_differences);
    }

    ExitCode::Ok
}

pub fn plan(args: &PlanArgs, cfg: &CoreConfig, json: bool) -> ExitCode {
    let status = match compute(&args.modpack, &args.instance) {
        Ok(status) => status,
        Err(code) => return code,
    };
    let plan = SyncPlan::new(&status, args.mode(cfg));

    if json {
        return document::print_json(&plan);
    }

    if plan.is_empty() {
        println!("Nothing to do in {} mode", plan.mode);
        return ExitCode::Ok;
    }

    for filename in &plan.add {
        println!("add     {filename}");
    }
    for filename in &plan.remove {
        println!("remove  {filename}");
    }
    for fix in &plan.set_enabled {
        let state = if fix.enabled { "enable" } else { "disable" };
        println!("{state: <8}{}", fix.filename);
    }
    for filename in &plan.preserve {
        println!("keep    {filename}");
    }
    if plan.update_loader {
        println!("update  loader");
    }

    ExitCode::Ok
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(mode: Option<SyncMode>) -> PlanArgs {
        PlanArgs {
            modpack: "pack.toml".into(),
            instance: "instance.toml".into(),
            mode,
        }
    }

    #[test]
    fn test_mode_falls_back_to_config() {
        let mut cfg = CoreConfig::default();
        assert_eq!(args(None).mode(&cfg), SyncMode::Overwrite);

        cfg.sync.default_mode = SyncMode::Skip;
        assert_eq!(args(None).mode(&cfg), SyncMode::Skip);
        assert_eq!(args(Some(SyncMode::NewOnly)).mode(&cfg), SyncMode::NewOnly);
    }
}
