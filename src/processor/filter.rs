//! Flattening, ordering and the flashback filter.

use crate::model::{Row, Section};

/// Flatten sections into render-ready rows. Section order is the
/// parser's discovery order (maps by filename, then common events);
/// events keep their per-map merged order.
pub fn flatten(sections: Vec<Section>) -> Vec<Row> {
    let mut rows = Vec::new();
    for section in sections {
        for (label, info) in section.events {
            rows.push(Row {
                kind: section.kind,
                section: section.name.clone(),
                label,
                info,
            });
        }
    }
    rows
}

/// Drop rows related to flashback content: a row is excluded when the
/// case-folded section (map) name contains `marker` OR the case-folded
/// event name does. Both checks are always evaluated.
pub fn drop_flashbacks(rows: Vec<Row>, marker: &str) -> Vec<Row> {
    let marker = marker.to_lowercase();
    rows.into_iter()
        .filter(|row| {
            let in_section = row.section.to_lowercase().contains(&marker);
            let in_event = row.info.name.to_lowercase().contains(&marker);
            !(in_section || in_event)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventInfo, SectionKind};

    fn row(section: &str, event_name: &str) -> Row {
        Row {
            kind: SectionKind::Map(1),
            section: section.into(),
            label: "event 0".into(),
            info: EventInfo {
                name: event_name.into(),
                ..EventInfo::default()
            },
        }
    }

    #[test]
    fn flatten_preserves_order() {
        let sections = vec![
            Section {
                kind: SectionKind::Map(1),
                name: "Village".into(),
                events: vec![
                    ("event 0".into(), EventInfo::default()),
                    ("event 1".into(), EventInfo::default()),
                ],
            },
            Section {
                kind: SectionKind::CommonEvent(4),
                name: "Intro".into(),
                events: vec![("event 4".into(), EventInfo::default())],
            },
        ];
        let rows = flatten(sections);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["event 0", "event 1", "event 4"]);
        assert_eq!(rows[2].kind, SectionKind::CommonEvent(4));
    }

    #[test]
    fn map_name_match_excludes_regardless_of_event_name() {
        let rows = vec![row("回想の间", "Greeter"), row("Village", "Greeter")];
        let kept = drop_flashbacks(rows, "回想");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].section, "Village");
    }

    #[test]
    fn event_name_match_excludes_even_on_named_maps() {
        // the OR is unconditional: a non-empty map name must not mask the
        // event-name check
        let rows = vec![row("Village", "回想シーン"), row("Village", "Greeter")];
        let kept = drop_flashbacks(rows, "回想");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].info.name, "Greeter");
    }

    #[test]
    fn marker_matching_is_case_folded() {
        let rows = vec![row("Flashback Room", "x"), row("Garden", "x")];
        let kept = drop_flashbacks(rows, "FLASHBACK");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].section, "Garden");
    }
}
