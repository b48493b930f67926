//! Scaffolding for new Glutinum binding packages.
//!
//! A binding lives in `glues/<Name>/` with its own changelog and project
//! file, so it can be released on its own with `release nuget`.

use crate::errors::{BuildError, Result, io_error_with_path};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory, relative to the repository root, holding all bindings.
pub const GLUES_DIR: &str = "glues";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlueSpec {
    /// PascalCase binding name, e.g. `Mime`.
    pub name: String,
    /// npm package the binding targets, e.g. `mime`.
    pub npm_package: String,
    pub npm_url: Option<String>,
    pub authors: String,
}

impl GlueSpec {
    pub fn npm_url(&self) -> String {
        self.npm_url
            .clone()
            .unwrap_or_else(|| format!("https://www.npmjs.com/package/{}", self.npm_package))
    }

    pub fn project_file_name(&self) -> String {
        format!("Glutinum.{}.fsproj", self.name)
    }
}

#[derive(Debug)]
pub struct ScaffoldReport {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Check that `name` can be used as an F# module and package name.
pub fn validate_glue_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(BuildError::InvalidData(format!(
            "invalid binding name '{name}': use letters, digits, '.' or '_', starting with a letter"
        )))
    }
}

/// Create the files of a new binding under `<root>/glues/<name>`.
pub fn scaffold_glue(root: &Path, spec: &GlueSpec) -> Result<ScaffoldReport> {
    validate_glue_name(&spec.name)?;
    if spec.npm_package.trim().is_empty() {
        return Err(BuildError::InvalidData("npm package name cannot be empty".into()));
    }

    let dir = root.join(GLUES_DIR).join(&spec.name);
    if dir.exists() {
        return Err(BuildError::InvalidData(format!(
            "{} already exists, refusing to overwrite it",
            dir.display()
        )));
    }

    let files = [
        (PathBuf::from("CHANGELOG.md"), changelog()),
        (PathBuf::from("README.md"), readme(spec)),
        (Path::new("src").join(spec.project_file_name()), glue_fsproj(spec)),
        (
            Path::new("src").join(format!("Glutinum.{}.fs", spec.name)),
            glue_source(spec),
        ),
        (
            Path::new("tests").join(format!("Tests.{}.fsproj", spec.name)),
            test_fsproj(spec),
        ),
        (
            Path::new("tests").join(format!("Tests.{}.fs", spec.name)),
            test_source(spec),
        ),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (relative, content) in files {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error_with_path(e, parent))?;
        }
        debug!("Writing {}", path.display());
        fs::write(&path, content).map_err(|e| io_error_with_path(e, &path))?;
        written.push(path);
    }

    Ok(ScaffoldReport {
        dir,
        files: written,
    })
}

fn lower_first_letter(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn changelog() -> String {
    "# Changelog
All notable changes to this project will be documented in this file.

The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.0.0/),
and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).

## Unreleased
"
    .to_string()
}

fn readme(spec: &GlueSpec) -> String {
    format!(
        "# Glutinum.{name}

Binding for [{package}]({url})

## Usage
",
        name = spec.name,
        package = spec.npm_package,
        url = spec.npm_url(),
    )
}

fn glue_fsproj(spec: &GlueSpec) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Project Sdk="Microsoft.NET.Sdk">
    <PropertyGroup>
        <Version>0.0.0</Version>
        <TargetFramework>netstandard2.0</TargetFramework>
        <GenerateDocumentationFile>true</GenerateDocumentationFile>
        <Authors>{authors}</Authors>
        <Description>
            Fable bindings for npm {url} package
        </Description>
    </PropertyGroup>
    <ItemGroup>
        <Compile Include="Glutinum.{name}.fs" />
    </ItemGroup>
</Project>
"#,
        authors = spec.authors,
        url = spec.npm_url(),
        name = spec.name,
    )
}

fn glue_source(spec: &GlueSpec) -> String {
    format!(
        r#"module rec Glutinum.{name}

open Fable.Core

[<Import("default", "{package}")>]
let {value} : {name}.IExports = jsNative

module {name} =

    type [<AllowNullLiteral>] IExports =
        class end
"#,
        name = spec.name,
        package = spec.npm_package,
        value = lower_first_letter(&spec.name),
    )
}

fn test_fsproj(spec: &GlueSpec) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Project Sdk="Microsoft.NET.Sdk">
    <PropertyGroup>
        <TargetFramework>netstandard2.0</TargetFramework>
        <GenerateDocumentationFile>true</GenerateDocumentationFile>
        <RelativePathToTestsShared>../../../tests-shared</RelativePathToTestsShared>
    </PropertyGroup>
    <Import Project="$(RelativePathToTestsShared)/Tests.Shared.props" />
    <ItemGroup>
        <Compile Include="Tests.{name}.fs" />
    </ItemGroup>
    <ItemGroup>
        <ProjectReference Include="../src/Glutinum.{name}.fsproj" />
    </ItemGroup>
</Project>
"#,
        name = spec.name,
    )
}

fn test_source(spec: &GlueSpec) -> String {
    format!(
        r#"module Tests.{name}

open Mocha
open Fable.Core
open Glutinum.{name}

describe "{name}" (fun _ ->

    it "{name} bindings work" (fun _ ->
        failwith "Tests should go here"
    )
)
"#,
        name = spec.name,
    )
}
