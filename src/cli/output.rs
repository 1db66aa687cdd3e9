//! CLI output: error mapping and rendering of repository results.

use crate::error::VolumeError;
use crate::volume::VolumeConfig;
use comfy_table::Table;
use serde::Serialize;
use std::collections::BTreeMap;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &VolumeError) -> String {
    match e {
        VolumeError::Merge(merge) => format!(
            "{}\nRun `volconfig keys` to list the accepted options.",
            merge
        ),
        other => other.to_string(),
    }
}

pub fn format_json<T: Serialize>(value: &T) -> Result<String, VolumeError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| VolumeError::ConfigError(format!("Failed to render output: {}", e)))
}

pub fn format_volume_table(volumes: &BTreeMap<String, VolumeConfig>) -> String {
    if volumes.is_empty() {
        return "No volumes found.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Volume", "Size", "Snapshots", "Frequency", "Keep"]);
    for (name, config) in volumes {
        let options = &config.options;
        let (frequency, keep) = if options.use_snapshots {
            (
                options.snapshot.frequency.clone(),
                options.snapshot.keep.to_string(),
            )
        } else {
            ("-".to_string(), "-".to_string())
        };
        table.add_row(vec![
            name.clone(),
            options.size.to_string(),
            options.use_snapshots.to_string(),
            frequency,
            keep,
        ]);
    }
    table.to_string()
}

pub fn format_name_list(kind: &str, names: &[String]) -> String {
    if names.is_empty() {
        return format!("No {}s found.", kind);
    }
    let mut output = String::new();
    for name in names {
        output.push_str(name);
        output.push('\n');
    }
    output.push_str(&format!("\nTotal: {} {}(s)", names.len(), kind));
    output
}
