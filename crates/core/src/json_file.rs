use std::{fs, path::Path};

use anyhow::Context;
use querysim_shared::AppError;
use serde::Serialize;
use serde_json::Value;

pub fn read_json(path: &Path) -> Result<Value, AppError> {
  let raw =
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let value = serde_json::from_str(&raw)
    .with_context(|| format!("failed to parse {} as JSON", path.display()))?;
  Ok(value)
}

/// Write `value` as pretty-printed JSON (two-space indent).
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AppError> {
  let body = serde_json::to_string_pretty(value)?;
  fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
  Ok(())
}
