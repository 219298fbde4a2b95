//! Reference id -> name tables.
//!
//! Each loader degrades to an empty table on failure; a dangling lookup
//! later resolves to the `"<kind> <id>"` fallback instead of erroring.

use log::{error, info};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use super::read_json;
use crate::model::RefTables;

#[derive(Debug, Deserialize)]
struct NamedEntry {
    id: i64,
    #[serde(default)]
    name: String,
}

pub fn load_tables(dir: &Path) -> RefTables {
    RefTables {
        actors: load_named(dir, "Actors.json", "actor"),
        maps: load_map_names(dir),
        items: load_named(dir, "Items.json", "item"),
        variables: load_system_list(dir, "variables"),
        switches: load_system_list(dir, "switches"),
    }
}

/// `Actors.json` / `Items.json`: an array of `{id, name}` objects whose
/// first entry is null.
fn load_named(dir: &Path, file: &str, kind: &str) -> HashMap<i64, String> {
    let mut names = HashMap::new();
    match read_json(&dir.join(file)) {
        Ok(Value::Array(entries)) => {
            for value in entries {
                if value.is_null() {
                    continue;
                }
                match serde_json::from_value::<NamedEntry>(value) {
                    Ok(entry) => {
                        names.insert(entry.id, entry.name);
                    }
                    Err(e) => error!("bad entry in {file}: {e}"),
                }
            }
            info!("loaded {} {kind} names", names.len());
        }
        Ok(_) => error!("{file} is not an array"),
        Err(e) => error!("loading {kind} names: {e:#}"),
    }
    names
}

/// `MapInfos.json` comes in two shapes: an id-indexed array with null
/// holes, or an object keyed by stringified ids.
fn load_map_names(dir: &Path) -> HashMap<i64, String> {
    let mut names = HashMap::new();
    match read_json(&dir.join("MapInfos.json")) {
        Ok(Value::Array(entries)) => {
            for value in entries {
                if value.is_null() {
                    continue;
                }
                if let (Some(id), Some(name)) = (
                    value.get("id").and_then(Value::as_i64),
                    value.get("name").and_then(Value::as_str),
                ) {
                    names.insert(id, name.to_string());
                }
            }
        }
        Ok(Value::Object(entries)) => {
            for (key, value) in entries {
                if value.is_null() {
                    continue;
                }
                if let (Ok(id), Some(name)) =
                    (key.parse::<i64>(), value.get("name").and_then(Value::as_str))
                {
                    names.insert(id, name.to_string());
                }
            }
        }
        Ok(_) => error!("MapInfos.json has an unexpected shape"),
        Err(e) => error!("loading map names: {e:#}"),
    }
    info!("loaded {} map names", names.len());
    names
}

/// `System.json` keeps variable and switch names as plain string lists
/// where the index is the id (slot 0 is null).
fn load_system_list(dir: &Path, key: &str) -> HashMap<i64, String> {
    let mut names = HashMap::new();
    match read_json(&dir.join("System.json")) {
        Ok(root) => {
            if let Some(list) = root.get(key).and_then(Value::as_array) {
                for (i, value) in list.iter().enumerate() {
                    if let Some(name) = value.as_str() {
                        if !name.is_empty() {
                            names.insert(i as i64, name.to_string());
                        }
                    }
                }
            }
            info!("loaded {} {key} names", names.len());
        }
        Err(e) => error!("loading {key} names: {e:#}"),
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_entry_tolerates_missing_name() {
        let entry: NamedEntry = serde_json::from_value(serde_json::json!({"id": 3})).unwrap();
        assert_eq!(entry.id, 3);
        assert_eq!(entry.name, "");
    }

    #[test]
    fn map_names_accept_object_keyed_shape() {
        let dir = std::env::temp_dir().join("rmstory_mapinfos_obj");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("MapInfos.json"),
            r#"{"1": {"name": "Castle"}, "2": null, "x": {"name": "bad key"}}"#,
        )
        .unwrap();
        let names = load_map_names(&dir);
        std::fs::remove_dir_all(&dir).ok();
        assert_eq!(names.get(&1).map(String::as_str), Some("Castle"));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn absent_files_yield_empty_tables() {
        let tables = load_tables(Path::new("/nonexistent"));
        assert!(tables.actors.is_empty());
        assert!(tables.maps.is_empty());
        assert_eq!(tables.map_label(17), "map 17");
        assert_eq!(tables.variable_label(3), "variable 3");
    }
}
