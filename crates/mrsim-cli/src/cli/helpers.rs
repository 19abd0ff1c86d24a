use super::CliError;
use anyhow::Context;
use mrsim_core::domain::MrsimError;
use mrsim_core::simulator::{SourceLocation, import_json};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub(super) fn read_json_file(path: &Path) -> Result<Value, CliError> {
    let location = SourceLocation::Local(path.to_path_buf());
    let bytes = fs::read(path)
        .map_err(|source| MrsimError::source_not_found(location.to_string(), source))?;
    Ok(import_json(&bytes, &location)?)
}

pub(super) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered =
        serde_json::to_string_pretty(value).context("failed to serialize command output")?;
    println!("{rendered}");
    Ok(())
}
