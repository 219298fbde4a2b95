//! Event deduplication.
//!
//! Two independent merges: structurally identical events within one map
//! collapse into a single labeled record, and consecutive repeated
//! dialogue lines collapse into one annotated line.

use crate::model::{DialogueLine, EventInfo};

/// Group events whose full ordered dialogue (speaker and text) is
/// identical. The first event of a group keeps its info and gets the
/// label `event {id}` or `event {id} + {n}` for n extra events folded in;
/// trigger conditions of the whole group are concatenated in group order.
///
/// Groups are exactly the equivalence classes of "identical dialogue
/// sequence"; running the merge on its own output changes nothing.
pub fn merge_events(events: Vec<(i64, EventInfo)>) -> Vec<(String, EventInfo)> {
    let mut groups: Vec<(Vec<DialogueLine>, Vec<(i64, EventInfo)>)> = Vec::new();
    for (id, info) in events {
        match groups.iter_mut().find(|(key, _)| *key == info.dialogue) {
            Some((_, members)) => members.push((id, info)),
            None => {
                let key = info.dialogue.clone();
                groups.push((key, vec![(id, info)]));
            }
        }
    }

    let mut merged = Vec::with_capacity(groups.len());
    for (_, mut members) in groups {
        let extra = members.len() - 1;
        let (first_id, mut info) = members.remove(0);
        for (_, other) in members {
            if let Some(cond) = other.trigger_condition {
                info.trigger_conditions.push(cond);
            }
            info.trigger_conditions.extend(other.trigger_conditions);
        }
        let label = if extra > 0 {
            format!("event {first_id} + {extra}")
        } else {
            format!("event {first_id}")
        };
        merged.push((label, info));
    }
    merged
}

/// Run-length-collapse consecutive identical dialogue lines into one line
/// suffixed with ` +{count}`. Non-adjacent duplicates stay separate.
/// Idempotent: a suffixed line never equals its unsuffixed neighbour.
pub fn merge_dialogues(dialogue: &[DialogueLine]) -> Vec<DialogueLine> {
    let mut merged = Vec::new();
    let mut run: Option<(&DialogueLine, usize)> = None;

    for line in dialogue {
        run = match run {
            Some((current, count)) if current == line => Some((current, count + 1)),
            Some((current, count)) => {
                merged.push(collapse(current, count));
                Some((line, 1))
            }
            None => Some((line, 1)),
        };
    }
    if let Some((current, count)) = run {
        merged.push(collapse(current, count));
    }
    merged
}

fn collapse(line: &DialogueLine, count: usize) -> DialogueLine {
    if count > 1 {
        DialogueLine {
            speaker: line.speaker.clone(),
            text: format!("{} +{}", line.text, count),
        }
    } else {
        line.clone()
    }
}
