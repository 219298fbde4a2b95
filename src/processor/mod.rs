//! The functional core: interpret events, merge duplicates, order and
//! filter the result.

pub mod builder;
pub mod filter;
pub mod interpreter;
pub mod merge;
pub mod text;

use log::info;

use crate::model::{RawProject, Row, Section, SectionKind};

/// Run every processing pass and return render-ready rows.
///
/// `flashback_marker` enables the flashback filter when set.
pub fn run(raw: &RawProject, flashback_marker: Option<&str>) -> Vec<Row> {
    let mut sections = Vec::new();

    for map in &raw.maps {
        let events: Vec<_> = map
            .events
            .iter()
            .filter_map(|e| builder::build_event_info(e, &raw.tables).map(|info| (e.id, info)))
            .collect();
        if events.is_empty() {
            continue;
        }
        sections.push(Section {
            kind: SectionKind::Map(map.id),
            name: map.name.clone(),
            events: merge::merge_events(events),
        });
    }

    // Common events stand alone: one section each, never merged.
    for event in &raw.common_events {
        if let Some(info) = builder::build_event_info(event, &raw.tables) {
            let name = if info.name.is_empty() {
                format!("common event {}", event.id)
            } else {
                info.name.clone()
            };
            sections.push(Section {
                kind: SectionKind::CommonEvent(event.id),
                name,
                events: vec![(format!("event {}", event.id), info)],
            });
        }
    }

    let rows = filter::flatten(sections);
    match flashback_marker {
        Some(marker) => {
            let before = rows.len();
            let kept = filter::drop_flashbacks(rows, marker);
            info!("flashback filter dropped {} of {} events", before - kept.len(), before);
            kept
        }
        None => rows,
    }
}
