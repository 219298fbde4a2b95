//! Data-directory discovery and per-file loading.
//!
//! One bad map file must not take down the run: every `MapNNN.json` is
//! parsed in isolation, failures are logged and the file is skipped.

pub mod events;
pub mod tables;

use anyhow::{Context, Result, anyhow};
use log::{error, info};
use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::model::{EventSource, MapFile, RawProject, RefTables};

const REQUIRED_FILES: [&str; 4] = ["Actors.json", "MapInfos.json", "Items.json", "System.json"];

static MAP_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Map(\d+)\.json$").expect("map filename pattern"));

/// Load the whole project: reference tables, map event files, common events.
pub fn load_project(input: &Path) -> Result<RawProject> {
    let dir = find_data_dir(input)?;
    info!("using data directory {}", dir.display());

    let tables = tables::load_tables(&dir);
    let maps = load_map_files(&dir, &tables)?;
    let common_events = load_common_events(&dir);

    Ok(RawProject {
        tables,
        maps,
        common_events,
    })
}

/// Return the reference files missing from `dir`.
pub fn validate_data_dir(dir: &Path) -> Vec<&'static str> {
    REQUIRED_FILES
        .iter()
        .filter(|f| !dir.join(f).is_file())
        .copied()
        .collect()
}

/// Accept either the game root or its `data/` child as input.
fn find_data_dir(input: &Path) -> Result<PathBuf> {
    if validate_data_dir(input).is_empty() {
        return Ok(input.to_path_buf());
    }
    let data = input.join("data");
    if data.is_dir() && validate_data_dir(&data).is_empty() {
        return Ok(data);
    }
    Err(anyhow!(
        "no valid data directory at {}; missing: {}",
        input.display(),
        validate_data_dir(input).join(", ")
    ))
}

/// Read a JSON file, tolerating the UTF-8 BOM MV exports carry.
pub(crate) fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    serde_json::from_str(text).with_context(|| format!("parsing {}", path.display()))
}

/// Collect `MapNNN.json` files in lexicographic filename order so the
/// output (and the merge labeling that depends on encounter order) is
/// reproducible.
fn load_map_files(dir: &Path, tables: &RefTables) -> Result<Vec<MapFile>> {
    let mut found: Vec<(String, i64)> = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(caps) = MAP_FILE_RE.captures(&name) {
            if let Ok(id) = caps[1].parse::<i64>() {
                found.push((name, id));
            }
        }
    }
    found.sort();

    let mut maps = Vec::with_capacity(found.len());
    for (name, id) in found {
        let path = dir.join(&name);
        match load_map_file(&path, id, tables) {
            Ok(map) => {
                info!("extracted map {} ({} events)", id, map.events.len());
                maps.push(map);
            }
            Err(e) => error!("skipping {name}: {e:#}"),
        }
    }
    Ok(maps)
}

fn load_map_file(path: &Path, id: i64, tables: &RefTables) -> Result<MapFile> {
    let root = read_json(path)?;
    // Some exports wrap the map object in a one-element array.
    let root = match root {
        Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
        other => other,
    };
    let event_values = root
        .get("events")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("file has no `events` array"))?;

    let mut events = Vec::new();
    for (index, value) in event_values.iter().enumerate() {
        if value.is_null() {
            continue;
        }
        let event = events::decode_map_event(index as i64, value)
            .with_context(|| format!("event {index}"))?;
        events.push(event);
    }

    Ok(MapFile {
        id,
        name: tables.map_label(id),
        events,
    })
}

/// `CommonEvents.json` is optional; a malformed file is logged and treated
/// as absent.
fn load_common_events(dir: &Path) -> Vec<EventSource> {
    let path = dir.join("CommonEvents.json");
    if !path.is_file() {
        return Vec::new();
    }
    match load_common_events_file(&path) {
        Ok(events) => {
            info!("extracted {} common events", events.len());
            events
        }
        Err(e) => {
            error!("skipping CommonEvents.json: {e:#}");
            Vec::new()
        }
    }
}

fn load_common_events_file(path: &Path) -> Result<Vec<EventSource>> {
    let root = read_json(path)?;
    let values = root
        .as_array()
        .ok_or_else(|| anyhow!("file is not an array"))?;

    let mut events = Vec::new();
    for (index, value) in values.iter().enumerate() {
        if value.is_null() {
            continue;
        }
        let event =
            events::decode_common_event(value).with_context(|| format!("common event {index}"))?;
        events.push(event);
    }
    Ok(events)
}
