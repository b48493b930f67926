use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Build, watch, test and release the Thoth.Elmish.FormBuilder monorepo
#[derive(Debug, Parser)]
#[command(name = "thoth-build", version, about, long_about = None)]
pub struct Cli {
    /// Repository root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Show debug logs, including every spawned command
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Commands related to the example project
    Examples(ExamplesArgs),

    /// Compile and run the test suite
    Test(TestArgs),

    /// Publish the version pending in a CHANGELOG.md, reverting the manifest on failure
    Release(ReleaseArgs),

    /// Manage Glutinum bindings
    Glue(GlueArgs),
}

#[derive(Debug, Args)]
pub struct ExamplesArgs {
    #[command(subcommand)]
    pub command: ExamplesCommands,
}

#[derive(Debug, Subcommand)]
pub enum ExamplesCommands {
    /// Start the example project in watch mode
    Watch,

    /// Build the example project using production mode
    Build,

    /// Remove build outputs of the example project
    Clean,
}

#[derive(Debug, Args, Default)]
pub struct TestArgs {
    /// Recompile and rerun the tests on change
    #[arg(long)]
    pub watch: bool,
}

#[derive(Debug, Args)]
pub struct ReleaseArgs {
    #[command(subcommand)]
    pub command: ReleaseCommands,
}

#[derive(Debug, Subcommand)]
pub enum ReleaseCommands {
    /// Bump package.json and run `npm publish`
    Npm(NpmReleaseArgs),

    /// Bump the <Version> of an MSBuild project, pack it and push it to NuGet (needs NUGET_KEY)
    Nuget(NugetReleaseArgs),
}

#[derive(Debug, Args)]
#[command(after_long_help = "\
Examples:\n  thoth-build release npm packages/form\n  thoth-build release npm packages/form -- --tag beta\n\nAll arguments after `--` are forwarded to `npm publish` (separator required).")]
pub struct NpmReleaseArgs {
    /// Directory holding CHANGELOG.md and package.json
    pub directory: PathBuf,

    /// Extra flags passed through to `npm publish` (must follow `--`)
    #[arg(last = true, value_name = "PUBLISH_ARG")]
    pub publish_args: Vec<String>,
}

#[derive(Debug, Args)]
pub struct NugetReleaseArgs {
    /// Directory holding CHANGELOG.md and the project file
    pub directory: PathBuf,

    /// Project file name, e.g. Thoth.Elmish.FormBuilder.fsproj
    pub project_file: String,

    /// Also create a GitHub release for the version (needs GITHUB_TOKEN)
    #[arg(long)]
    pub github_release: bool,
}

#[derive(Debug, Args)]
pub struct GlueArgs {
    #[command(subcommand)]
    pub command: GlueCommands,
}

#[derive(Debug, Subcommand)]
pub enum GlueCommands {
    /// Scaffold a new binding under glues/<NAME>
    New(GlueNewArgs),
}

#[derive(Debug, Args)]
pub struct GlueNewArgs {
    /// Binding name, e.g. Mime
    pub name: String,

    /// npm package the binding targets (prompted if omitted)
    #[arg(long)]
    pub npm_package: Option<String>,

    /// Link used in the README and package description (defaults to npmjs.com)
    #[arg(long)]
    pub npm_url: Option<String>,

    /// Authors written in the project file
    #[arg(long, default_value = "")]
    pub authors: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_examples_watch() {
        let cli = Cli::try_parse_from(["thoth-build", "examples", "watch"]).unwrap();
        match cli.command {
            Commands::Examples(args) => assert!(matches!(args.command, ExamplesCommands::Watch)),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn examples_requires_subcommand() {
        assert!(Cli::try_parse_from(["thoth-build", "examples"]).is_err());
    }

    #[test]
    fn parses_test_watch_with_global_flags() {
        let cli =
            Cli::try_parse_from(["thoth-build", "test", "--watch", "-v", "--root", "repo"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.root, Some(PathBuf::from("repo")));
        match cli.command {
            Commands::Test(args) => assert!(args.watch),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn parses_release_npm_passthrough_flags() {
        let cli = Cli::try_parse_from([
            "thoth-build",
            "release",
            "npm",
            "packages/form",
            "--",
            "--tag",
            "beta",
        ])
        .unwrap();
        match cli.command {
            Commands::Release(ReleaseArgs {
                command: ReleaseCommands::Npm(args),
            }) => {
                assert_eq!(args.directory, PathBuf::from("packages/form"));
                assert_eq!(args.publish_args, vec!["--tag", "beta"]);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn release_npm_requires_directory() {
        assert!(Cli::try_parse_from(["thoth-build", "release", "npm"]).is_err());
    }

    #[test]
    fn parses_release_nuget() {
        let cli = Cli::try_parse_from([
            "thoth-build",
            "release",
            "nuget",
            "src",
            "Thoth.Elmish.FormBuilder.fsproj",
            "--github-release",
        ])
        .unwrap();
        match cli.command {
            Commands::Release(ReleaseArgs {
                command: ReleaseCommands::Nuget(args),
            }) => {
                assert_eq!(args.directory, PathBuf::from("src"));
                assert_eq!(args.project_file, "Thoth.Elmish.FormBuilder.fsproj");
                assert!(args.github_release);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn release_nuget_requires_project_file() {
        assert!(Cli::try_parse_from(["thoth-build", "release", "nuget", "src"]).is_err());
    }

    #[test]
    fn parses_glue_new() {
        let cli = Cli::try_parse_from([
            "thoth-build",
            "glue",
            "new",
            "Mime",
            "--npm-package",
            "mime",
        ])
        .unwrap();
        match cli.command {
            Commands::Glue(GlueArgs {
                command: GlueCommands::New(args),
            }) => {
                assert_eq!(args.name, "Mime");
                assert_eq!(args.npm_package.as_deref(), Some("mime"));
                assert!(args.npm_url.is_none());
                assert_eq!(args.authors, "");
            }
            _ => panic!("wrong variant"),
        }
    }
}
