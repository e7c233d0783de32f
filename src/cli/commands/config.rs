use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success, warning};
use std::path::Path;
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            info(format!("Current configuration ({}):\n", path.display()));
            println!("{}", serde_yaml::to_string(cfg)?);
        }

        if *edit_config {
            edit_file(&path, editor.as_deref());
        }

        if !*print_config && !*edit_config {
            warning("Nothing to do: use --print or --edit.");
        }
    }

    Ok(())
}

/// Open `path` in the requested editor, falling back to `$EDITOR`/`$VISUAL`
/// or the platform default.
fn edit_file(path: &Path, requested: Option<&str>) {
    let default_editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    let editor_to_use = requested.unwrap_or(&default_editor);

    match Command::new(editor_to_use).arg(path).status() {
        Ok(s) if s.success() => {
            success(format!("Configuration file edited using '{editor_to_use}'"));
        }
        _ => {
            warning(format!(
                "Editor '{editor_to_use}' not available, falling back to '{default_editor}'"
            ));
            match Command::new(&default_editor).arg(path).status() {
                Ok(s) if s.success() => success(format!(
                    "Configuration file edited using fallback '{default_editor}'"
                )),
                _ => error(format!(
                    "Failed to edit configuration file using fallback '{default_editor}'"
                )),
            }
        }
    }
}
