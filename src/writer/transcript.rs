//! Renders the ordered, filtered rows into the final transcript text.

use std::collections::HashSet;

use crate::model::{OutputOptions, Row, Summary};
use crate::processor::merge::merge_dialogues;

/// Render every row into one string and tally the run summary.
///
/// Section layout per event: a `=== map - event ===` header, then trigger,
/// dialogue, choices, conditions, transfers and variable changes, each
/// emitted only when non-empty and enabled.
pub fn render(rows: &[Row], opts: &OutputOptions) -> (String, Summary) {
    let mut out = String::new();
    let mut summary = Summary::default();
    let mut map_ids = HashSet::new();
    let mut common_ids = HashSet::new();

    for row in rows {
        summary.events += 1;
        match row.kind {
            crate::model::SectionKind::Map(id) => {
                map_ids.insert(id);
            }
            crate::model::SectionKind::CommonEvent(id) => {
                common_ids.insert(id);
            }
        }

        let info = &row.info;
        let display_name = if info.name.is_empty() { &row.label } else { &info.name };
        out.push_str(&format!("=== {} - {} ===\n\n", row.section, display_name));

        if opts.triggers {
            if let Some(line) = trigger_line(row, opts) {
                out.push_str(&format!("Trigger: {line}\n"));
                for cond in &info.trigger_conditions {
                    out.push_str(&format!("  also: {cond}\n"));
                }
                out.push('\n');
            }
        }

        let dialogue = merge_dialogues(&info.dialogue);
        if !dialogue.is_empty() {
            out.push_str("Dialogue:\n");
            for line in &dialogue {
                summary.dialogue_lines += 1;
                if line.speaker.is_empty() {
                    out.push_str(&format!("  {}\n", line.text));
                } else {
                    out.push_str(&format!("  {}: {}\n", line.speaker, line.text));
                }
            }
            out.push('\n');
        }

        if !info.choices.is_empty() {
            out.push_str("Choices:\n");
            if info.choice_outcomes.is_empty() {
                // no branch markers were seen; fall back to the flat list
                for choice in &info.choices {
                    out.push_str(&format!("  - {choice}\n"));
                }
            } else {
                for (choice, outcome) in &info.choice_outcomes {
                    if opts.choice_outcomes {
                        out.push_str(&format!("  - {choice} - leads to: {outcome}\n"));
                    } else {
                        out.push_str(&format!("  - {choice}\n"));
                    }
                }
            }
            out.push('\n');
        }

        if !info.conditions.is_empty() {
            out.push_str("Conditions:\n");
            for condition in &info.conditions {
                out.push_str(&format!("  {condition}\n"));
            }
            out.push('\n');
        }

        if opts.transfers && !info.transfers.is_empty() {
            out.push_str("Transfers:\n");
            for transfer in &info.transfers {
                out.push_str(&format!("  {transfer}\n"));
            }
            out.push('\n');
        }

        if opts.variable_changes && !info.variable_changes.is_empty() {
            out.push_str("Variable changes:\n");
            for change in &info.variable_changes {
                out.push_str(&format!("  {change}\n"));
            }
            out.push('\n');
        }

        out.push('\n');
    }

    summary.maps = map_ids.len();
    summary.common_events = common_ids.len();
    (out, summary)
}

/// `{kind label}: {condition clauses} at (x, y)`, each part subject to
/// its toggle; `None` when nothing is left to print.
fn trigger_line(row: &Row, opts: &OutputOptions) -> Option<String> {
    let info = &row.info;
    let mut line = String::new();
    if opts.player_condition {
        line.push_str(info.trigger.kind.label());
    }
    if let Some(cond) = &info.trigger_condition {
        if !line.is_empty() {
            line.push_str(": ");
        }
        line.push_str(cond);
    }
    if opts.touch_details && info.trigger.kind.is_touch() {
        if let Some((x, y)) = info.position {
            line.push_str(&format!(" at ({x}, {y})"));
        }
    }
    if line.is_empty() { None } else { Some(line) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DialogueLine, EventInfo, Row, SectionKind, Trigger, TriggerKind};

    fn sample_row() -> Row {
        Row {
            kind: SectionKind::Map(1),
            section: "Village".into(),
            label: "event 0 + 1".into(),
            info: EventInfo {
                name: "Greeter".into(),
                trigger: Trigger {
                    kind: TriggerKind::PlayerTouch,
                    ..Trigger::default()
                },
                position: Some((5, 3)),
                dialogue: vec![
                    DialogueLine {
                        speaker: "Alice".into(),
                        text: "Hello".into(),
                    },
                    DialogueLine {
                        speaker: "Alice".into(),
                        text: "Hello".into(),
                    },
                    DialogueLine {
                        speaker: "".into(),
                        text: "(silence)".into(),
                    },
                ],
                choices: vec!["Yes".into(), "No".into()],
                choice_outcomes: vec![("Yes".into(), "branch 1-2".into())],
                transfers: vec!["transfer to map 17".into()],
                variable_changes: vec!["variable 3 changed".into()],
                trigger_condition: Some("GateOpen is on".into()),
                trigger_conditions: vec!["switch 2 is on".into()],
                ..EventInfo::default()
            },
        }
    }

    #[test]
    fn renders_all_sections() {
        let (text, summary) = render(&[sample_row()], &OutputOptions::default());
        assert!(text.starts_with("=== Village - Greeter ===\n\n"));
        assert!(text.contains("Trigger: player touch: GateOpen is on at (5, 3)\n"));
        assert!(text.contains("  also: switch 2 is on\n"));
        assert!(text.contains("Dialogue:\n  Alice: Hello +2\n  (silence)\n"));
        assert!(text.contains("Choices:\n  - Yes - leads to: branch 1-2\n"));
        assert!(text.contains("Transfers:\n  transfer to map 17\n"));
        assert!(text.contains("Variable changes:\n  variable 3 changed\n"));
        assert_eq!(
            summary,
            Summary {
                maps: 1,
                common_events: 0,
                events: 1,
                dialogue_lines: 2,
            }
        );
    }

    #[test]
    fn label_stands_in_for_unnamed_events() {
        let mut row = sample_row();
        row.info.name.clear();
        let (text, _) = render(&[row], &OutputOptions::default());
        assert!(text.starts_with("=== Village - event 0 + 1 ===\n"));
    }

    #[test]
    fn toggles_suppress_their_sections() {
        let opts = OutputOptions {
            triggers: false,
            transfers: false,
            variable_changes: false,
            choice_outcomes: false,
            ..OutputOptions::default()
        };
        let (text, _) = render(&[sample_row()], &opts);
        assert!(!text.contains("Trigger:"));
        assert!(!text.contains("Transfers:"));
        assert!(!text.contains("Variable changes:"));
        assert!(text.contains("  - Yes\n"));
        assert!(!text.contains("leads to"));
        // dialogue and conditions are not toggleable
        assert!(text.contains("Dialogue:"));
    }

    #[test]
    fn nested_trigger_toggles() {
        let no_label = OutputOptions {
            player_condition: false,
            ..OutputOptions::default()
        };
        let (text, _) = render(&[sample_row()], &no_label);
        assert!(text.contains("Trigger: GateOpen is on at (5, 3)\n"));

        let no_touch = OutputOptions {
            touch_details: false,
            ..OutputOptions::default()
        };
        let (text, _) = render(&[sample_row()], &no_touch);
        assert!(text.contains("Trigger: player touch: GateOpen is on\n"));
    }

    #[test]
    fn bare_trigger_line_is_skipped_entirely() {
        let mut row = sample_row();
        row.info.trigger_condition = None;
        row.info.trigger_conditions.clear();
        row.info.position = None;
        let opts = OutputOptions {
            player_condition: false,
            ..OutputOptions::default()
        };
        let (text, _) = render(&[row], &opts);
        assert!(!text.contains("Trigger:"));
    }
}
