use crate::cli::{ExamplesArgs, ExamplesCommands};
use crate::ui;
use std::path::Path;
use thoth_build_core::errors::Result;
use thoth_build_core::{Config, ExamplesProject, ExecConfig};

pub fn run(args: &ExamplesArgs, root: &Path) -> Result<()> {
    let config = Config::load(root)?;
    let project = ExamplesProject::new(root, &config.examples, &ExecConfig::new(root));

    match args.command {
        ExamplesCommands::Build => {
            project.build()?;
            ui::log_success_value("Examples built", &project.root().display().to_string());
        }
        ExamplesCommands::Watch => project.watch()?,
        ExamplesCommands::Clean => {
            project.clean()?;
            ui::log_success_value("Cleaned", &project.root().display().to_string());
        }
    }
    Ok(())
}
