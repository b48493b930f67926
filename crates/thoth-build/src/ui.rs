use dialoguer::{
    Input,
    console::{Style, style},
    theme::ColorfulTheme,
};
use std::io;
use thoth_build_core::errors::{BuildError, Result};

pub const SUCCESS_PREFIX: &str = "✔";
pub const WARNING_PREFIX: &str = "⚠";
pub const ERROR_PREFIX: &str = "✖";
pub const INFO_PREFIX: &str = "ℹ";

pub fn log_success_value(label: &str, value: &str) {
    let theme = success_output_theme();
    let line = format!(
        "{} {}{} {}",
        theme.success_prefix.clone(),
        theme.prompt_style.apply_to(label),
        theme.success_suffix.clone(),
        theme.values_style.apply_to(value),
    );
    println!("{line}");
}

pub fn log_info(message: &str) {
    let prefix = style(INFO_PREFIX.to_string()).for_stdout().blue().bright();
    let message_style = Style::new().for_stdout().blue().bright();
    println!("{} {}", prefix, message_style.apply_to(message));
}

pub fn log_warning(message: &str) {
    let mut theme = prompt_theme();
    theme.error_prefix = style(WARNING_PREFIX.to_string()).for_stderr().yellow();
    theme.error_style = Style::new().for_stderr().yellow();

    let line = format!(
        "{} {}",
        theme.error_prefix.clone(),
        theme.error_style.apply_to(message)
    );
    eprintln!("{line}");
}

/// Prints an error to stderr. Used once per failed command, right before exiting.
pub fn log_error(context: &str, error: &BuildError) {
    let prefix = style(ERROR_PREFIX.to_string()).for_stderr().red();
    let message_style = Style::new().for_stderr().red();
    eprintln!(
        "{} {}",
        prefix,
        message_style.apply_to(format!("{context}: {error}"))
    );
}

pub fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("🧭".to_string()).cyan(),
        prompt_style: Style::new().for_stderr(),
        success_prefix: style(SUCCESS_PREFIX.to_string()).for_stderr().green(),
        success_suffix: style(":".to_string()).for_stderr(),
        values_style: Style::new().for_stderr(),
        ..ColorfulTheme::default()
    }
}

fn success_output_theme() -> ColorfulTheme {
    let mut theme = prompt_theme();
    theme.success_prefix = theme.success_prefix.clone().for_stdout();
    theme.success_suffix = theme.success_suffix.clone().for_stdout();
    theme.prompt_style = theme.prompt_style.clone().for_stdout();
    theme.values_style = theme.values_style.clone().for_stdout();
    theme
}

pub fn prompt_nonempty_string(prompt: &str) -> Result<String> {
    let theme = prompt_theme();
    loop {
        let value: String = Input::with_theme(&theme)
            .with_prompt(prompt)
            .report(false)
            .allow_empty(false)
            .interact_text()
            .map_err(prompt_io_error)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            log_warning("Enter a non-empty value.");
            continue;
        }
        return Ok(trimmed.to_string());
    }
}

/// Normalize an optional string input by trimming whitespace.
/// Returns None if the input is None or if the trimmed value is empty.
pub fn normalize_nonempty_string(input: Option<&str>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn prompt_io_error(error: dialoguer::Error) -> io::Error {
    match error {
        dialoguer::Error::IO(err) => err,
    }
}
