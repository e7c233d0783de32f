use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Make sure the export may write `path`: a new file is always fine, an
/// existing one needs `--force` or an explicit "yes" on stdin.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    ensure_writable_with(path, force, || ask_overwrite(path, &mut io::stdin().lock()))
}

fn ensure_writable_with(
    path: &Path,
    force: bool,
    confirm: impl FnOnce() -> AppResult<bool>,
) -> AppResult<()> {
    if !path.exists() {
        return Ok(());
    }
    if force || confirm()? {
        info(format!("Replacing {}", path.display()));
        return Ok(());
    }
    Err(AppError::Export(format!(
        "{} already exists and was not overwritten (use --force)",
        path.display()
    )))
}

fn ask_overwrite(path: &Path, input: &mut impl BufRead) -> AppResult<bool> {
    warning(format!("Export target {} already exists.", path.display()));
    print!("Overwrite it? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
