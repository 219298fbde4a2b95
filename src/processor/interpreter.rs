//! The command interpreter: a small state machine over one page's decoded
//! command list.
//!
//! Choice blocks have no explicit open/close pair in the stream, only the
//! shared `BlockEnd` terminator, so open prompts are tracked on an explicit
//! stack. Popping past the bottom is a documented no-op: a terminator that
//! closes a non-choice block simply finds the stack empty.

use log::debug;

use super::text::clean_text;
use crate::model::{DialogueLine, EventCommand, EventInfo, Page, RefTables};

/// Ordered outcome accumulator keyed by first-seen choice text.
///
/// Discovery order is load-bearing for the output, hence a plain vector
/// with linear lookup instead of a hash map.
#[derive(Debug, Default)]
pub struct OutcomeMap {
    entries: Vec<(String, Vec<String>)>,
}

impl OutcomeMap {
    pub fn push(&mut self, choice: &str, label: String) {
        match self.entries.iter_mut().find(|(c, _)| c == choice) {
            Some((_, labels)) => labels.push(label),
            None => self.entries.push((choice.to_string(), vec![label])),
        }
    }

    /// Flatten into `(choice, outcomes joined with " -> ")` pairs.
    pub fn into_joined(self) -> Vec<(String, String)> {
        self.entries
            .into_iter()
            .map(|(choice, labels)| (choice, labels.join(" -> ")))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Page-scoped interpreter state. Built fresh for every page: the speaker,
/// the choice stack and the branch counter never leak across pages.
pub struct Interpreter<'a> {
    tables: &'a RefTables,
    speaker: String,
    choice_stack: Vec<Vec<String>>,
    branch_id: u32,
}

impl<'a> Interpreter<'a> {
    pub fn new(tables: &'a RefTables) -> Self {
        Self {
            tables,
            speaker: String::new(),
            choice_stack: Vec::new(),
            branch_id: 1,
        }
    }

    /// Run one page, appending narrative fragments to `info` and choice
    /// outcomes to `outcomes` (which spans pages). `page_index` is 1-based.
    pub fn run_page(
        &mut self,
        page_index: usize,
        page: &Page,
        info: &mut EventInfo,
        outcomes: &mut OutcomeMap,
    ) {
        for cmd in page {
            match cmd {
                EventCommand::SpeakerHeader { speaker } => {
                    self.speaker = speaker
                        .as_deref()
                        .map(|s| clean_text(s, &self.tables.actors))
                        .unwrap_or_default();
                }
                EventCommand::TextLine(raw) => {
                    let text = clean_text(raw, &self.tables.actors);
                    debug!("dialogue: {}: {}", self.speaker, text);
                    info.dialogue.push(DialogueLine {
                        speaker: self.speaker.clone(),
                        text,
                    });
                }
                EventCommand::ShowChoices(raw_options) => {
                    let options: Vec<String> = raw_options
                        .iter()
                        .map(|o| clean_text(o, &self.tables.actors))
                        .collect();
                    debug!("choices: {options:?}");
                    info.choices.extend(options.iter().cloned());
                    self.choice_stack.push(options);
                    self.branch_id += 1;
                }
                EventCommand::ChoiceBranch(index) => {
                    // A marker with no open prompt, or an out-of-range
                    // index, is silently skipped.
                    if let Some(open) = self.choice_stack.last() {
                        if let Some(choice) = open.get(*index) {
                            outcomes.push(choice, format!("branch {}-{}", page_index, self.branch_id));
                        }
                    }
                }
                EventCommand::ConditionalBranch(operand) => {
                    let operand = operand.trim();
                    if !operand.is_empty() && operand != "0" && operand != "1" {
                        info.conditions.push(format!("condition: {operand}"));
                    }
                }
                EventCommand::TransferPlayer { map_id } => {
                    info.transfers
                        .push(format!("transfer to {}", self.tables.map_label(*map_id)));
                }
                EventCommand::ControlVariable { variable_id } => {
                    info.variable_changes
                        .push(format!("{} changed", self.tables.variable_label(*variable_id)));
                }
                EventCommand::BlockEnd => {
                    // Underflow is a no-op, not an error.
                    self.choice_stack.pop();
                }
            }
        }
    }

    #[cfg(test)]
    fn open_blocks(&self) -> usize {
        self.choice_stack.len()
    }
}
