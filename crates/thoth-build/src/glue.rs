use crate::cli::{GlueArgs, GlueCommands, GlueNewArgs};
use crate::ui;
use std::path::Path;
use thoth_build_core::errors::Result;
use thoth_build_core::{GlueSpec, scaffold_glue};

pub fn run(args: &GlueArgs, root: &Path) -> Result<()> {
    match &args.command {
        GlueCommands::New(new_args) => new_glue(new_args, root),
    }
}

fn new_glue(args: &GlueNewArgs, root: &Path) -> Result<()> {
    let npm_package = match ui::normalize_nonempty_string(args.npm_package.as_deref()) {
        Some(package) => package,
        None => ui::prompt_nonempty_string("npm package name")?,
    };

    let spec = GlueSpec {
        name: args.name.trim().to_string(),
        npm_package,
        npm_url: ui::normalize_nonempty_string(args.npm_url.as_deref()),
        authors: args.authors.trim().to_string(),
    };

    let report = scaffold_glue(root, &spec)?;
    ui::log_success_value("Created binding", &report.dir.display().to_string());
    for file in &report.files {
        let shown = file.strip_prefix(root).unwrap_or(file);
        println!("  created: {}", shown.display());
    }
    Ok(())
}
