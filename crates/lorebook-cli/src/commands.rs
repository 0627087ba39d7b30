//! Subcommand implementations

use std::path::Path;

use anyhow::{bail, Context, Result};
use lorebook_core::attachments::{referenced_attachments_in, AttachmentReclaimer, ReclaimPlan};
use lorebook_core::config::{Config, TOKEN_ENV_VAR};
use lorebook_core::render::{render_html, render_str};
use tracing::{info, warn};

use crate::OutputFormat;

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::load_default()?);
    };
    let mut config = Config::load(path)?;
    config.apply_token_override(std::env::var(TOKEN_ENV_VAR).ok());
    Ok(config)
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn render(path: &Path, format: OutputFormat) -> Result<()> {
    let rendered = render_str(&read_document(path)?);
    match format {
        OutputFormat::Html => print!("{}", render_html(&rendered)),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
    }
    Ok(())
}

pub fn attachments(path: &Path) -> Result<()> {
    for url in referenced_attachments_in(&read_document(path)?) {
        println!("{}", url);
    }
    Ok(())
}

pub async fn reclaim(config: &Config, old: &Path, new: &Path, dry_run: bool) -> Result<()> {
    let old = read_document(old)?;
    let new = read_document(new)?;

    if dry_run {
        println!("{}", dry_run_plan(config, &old, &new)?);
        return Ok(());
    }

    let reclaimer = reclaimer_for(config)?;
    let report = reclaimer.reclaim(&old, &new).await;

    for failure in report.failures() {
        warn!(url = %failure.url, "Not deleted; left for a later cleanup");
    }
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        skipped = report.skipped.len(),
        "Reclaim finished"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Pretty JSON of what a reclaim would delete; never touches storage
fn dry_run_plan(config: &Config, old: &str, new: &str) -> Result<String> {
    let plan = ReclaimPlan::compute(old, new, &config.storage.owned_domain());
    Ok(serde_json::to_string_pretty(&plan)?)
}

/// A reclaimer for the configured storage, or an error when no owned domain
/// is set
fn reclaimer_for(config: &Config) -> Result<AttachmentReclaimer> {
    if config.storage.owned_domain.trim().is_empty() {
        bail!("no storage.owned_domain configured; refusing to delete anything");
    }
    AttachmentReclaimer::from_config(&config.storage).context("building storage client")
}
