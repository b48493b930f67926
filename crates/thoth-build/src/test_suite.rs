use crate::cli::TestArgs;
use crate::ui;
use std::path::Path;
use thoth_build_core::errors::Result;
use thoth_build_core::{Config, ExecConfig, TestSuite};

pub fn run(args: &TestArgs, root: &Path) -> Result<()> {
    let config = Config::load(root)?;
    let suite = TestSuite::new(root, &config.tests, &ExecConfig::new(root));

    if args.watch {
        suite.watch()
    } else {
        suite.run()?;
        ui::log_success_value("Tests", "passed");
        Ok(())
    }
}
