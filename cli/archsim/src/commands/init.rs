//! `archsim init` — study scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use archsim_model::parse::generate_template;

use crate::manifest::{StudyManifest, MANIFEST_FILE};

/// Create a new study at the given path.
///
/// `name` is the study name. The directory `name` is created relative to cwd.
pub fn run(name: &str) -> Result<()> {
    create_study(Path::new(name), name)
}

pub(crate) fn create_study(study_dir: &Path, name: &str) -> Result<()> {
    if study_dir.exists() {
        bail!("directory '{}' already exists", study_dir.display());
    }

    fs::create_dir_all(study_dir.join("configs")).context("creating configs/ directory")?;
    fs::create_dir_all(study_dir.join("out")).context("creating out/ directory")?;

    fs::write(study_dir.join(MANIFEST_FILE), StudyManifest::template(name))
        .context("writing archsim.toml")?;

    let baseline = generate_template("baseline")?;
    fs::write(study_dir.join("configs").join("baseline.arch.toml"), baseline)
        .context("writing configs/baseline.arch.toml")?;

    fs::write(study_dir.join(".gitignore"), "out/\n").context("writing .gitignore")?;

    println!("Created study '{name}'");
    println!("  {name}/{MANIFEST_FILE}");
    println!("  {name}/configs/baseline.arch.toml");
    println!("  {name}/out/");
    println!("  {name}/.gitignore");

    Ok(())
}
