use crate::cli::{NpmReleaseArgs, NugetReleaseArgs, ReleaseArgs, ReleaseCommands};
use crate::ui;
use std::path::Path;
use thoth_build_core::env::{GITHUB_TOKEN, NUGET_KEY, require_env};
use thoth_build_core::errors::Result;
use thoth_build_core::{
    Config, ExecConfig, GitHubReleasePublisher, ManifestKind, NpmPublisher, NugetPublisher,
    PublishPipeline, ReleaseConfig, ReleaseOutcome, run_release,
};

pub fn run(args: &ReleaseArgs, root: &Path) -> Result<()> {
    let outcome = match &args.command {
        ReleaseCommands::Npm(npm_args) => release_npm(npm_args, root)?,
        ReleaseCommands::Nuget(nuget_args) => release_nuget(nuget_args, root)?,
    };
    report(&outcome);
    Ok(())
}

fn release_npm(args: &NpmReleaseArgs, root: &Path) -> Result<ReleaseOutcome> {
    let base = root.join(&args.directory);
    let config = ReleaseConfig::for_kind(base.clone(), "package.json", ManifestKind::PackageJson)?;
    let publisher =
        NpmPublisher::new(&base, &ExecConfig::new(base.clone())).with_args(&args.publish_args);
    run_release(&config, &publisher)
}

fn release_nuget(args: &NugetReleaseArgs, root: &Path) -> Result<ReleaseOutcome> {
    // Both secrets are checked before anything touches the project.
    let api_key = require_env(NUGET_KEY)?;
    let github_token = if args.github_release {
        Some(require_env(GITHUB_TOKEN)?)
    } else {
        None
    };

    let settings = Config::load(root)?;
    let base = root.join(&args.directory);
    let kind = ManifestKind::from_file_name(&args.project_file).unwrap_or(ManifestKind::MsBuild);
    let config = ReleaseConfig::for_kind(base.clone(), args.project_file.as_str(), kind)?;

    let exec = ExecConfig::new(base.clone());
    let mut pipeline = PublishPipeline::new().then(NugetPublisher::new(
        &base,
        &args.project_file,
        api_key,
        &settings.nuget.source,
        &exec,
    ));
    if let Some(token) = github_token {
        pipeline = pipeline.then(GitHubReleasePublisher::new(&settings.github, token));
    }

    run_release(&config, &pipeline)
}

fn report(outcome: &ReleaseOutcome) {
    match outcome {
        ReleaseOutcome::AlreadyPublished { version } => {
            ui::log_info(&format!("{version} is already published, nothing to do"));
        }
        ReleaseOutcome::Published { previous, version } => {
            ui::log_success_value("Published", &format!("{previous} → {version}"));
        }
    }
}
