use std::collections::HashMap;

/// One scripted command, decoded from its raw `(code, parameters)` pair.
///
/// Only the narrative-relevant MV codes get a variant; everything else is
/// dropped by the decoder and never reaches the interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum EventCommand {
    /// 101 – message window header; parameter 4 is the speaker name
    /// (absent in older exports).
    SpeakerHeader { speaker: Option<String> },
    /// 401 – one line of message text.
    TextLine(String),
    /// 102 – choice prompt with its raw option strings.
    ShowChoices(Vec<String>),
    /// 402 – "when [choice]" branch, carrying the option index.
    ChoiceBranch(usize),
    /// 111 – conditional branch; we keep the stringified first operand,
    /// the condition itself is never evaluated.
    ConditionalBranch(String),
    /// 201 – transfer player; parameter 1 is the destination map id.
    TransferPlayer { map_id: i64 },
    /// 122 – control variables; parameter 0 is the (first) variable id.
    ControlVariable { variable_id: i64 },
    /// 0 – block terminator, closes the innermost open choice block.
    BlockEnd,
}

/// One event page: an ordered command list.
pub type Page = Vec<EventCommand>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerKind {
    #[default]
    ActionButton,
    PlayerTouch,
    EventTouch,
    Autorun,
    Parallel,
    Unknown,
}

impl TriggerKind {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => TriggerKind::ActionButton,
            1 => TriggerKind::PlayerTouch,
            2 => TriggerKind::EventTouch,
            3 => TriggerKind::Autorun,
            4 => TriggerKind::Parallel,
            _ => TriggerKind::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TriggerKind::ActionButton => "action button",
            TriggerKind::PlayerTouch => "player touch",
            TriggerKind::EventTouch => "event touch",
            TriggerKind::Autorun => "autorun",
            TriggerKind::Parallel => "parallel",
            TriggerKind::Unknown => "unknown trigger",
        }
    }

    pub fn is_touch(self) -> bool {
        matches!(self, TriggerKind::PlayerTouch | TriggerKind::EventTouch)
    }
}

/// Page activation condition. Each field is `Some` only when the engine's
/// matching `*Valid` flag was set (or, in the loose common-event form, when
/// the id key itself was present).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageCondition {
    pub switch1: Option<i64>,
    pub switch2: Option<i64>,
    /// variable id and the threshold it must reach.
    pub variable: Option<(i64, i64)>,
    pub self_switch: Option<String>,
    pub item: Option<i64>,
    pub actor: Option<i64>,
}

impl PageCondition {
    /// Render the active clauses in fixed order, joined with " and ".
    /// Returns `None` when no clause is active.
    pub fn describe(&self, tables: &RefTables) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(id) = self.switch1 {
            parts.push(format!("{} is on", tables.switch_label(id)));
        }
        if let Some(id) = self.switch2 {
            parts.push(format!("{} is on", tables.switch_label(id)));
        }
        if let Some((id, threshold)) = self.variable {
            parts.push(format!("{} >= {}", tables.variable_label(id), threshold));
        }
        if let Some(ch) = &self.self_switch {
            parts.push(format!("self switch {ch} is on"));
        }
        if let Some(id) = self.item {
            parts.push(format!("party has {}", tables.item_label(id)));
        }
        if let Some(id) = self.actor {
            parts.push(format!("{} is in the party", tables.actor_label(id)));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" and "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trigger {
    pub kind: TriggerKind,
    pub condition: PageCondition,
}

/// One event exactly as read from the input files, before interpretation.
#[derive(Debug, Clone)]
pub struct EventSource {
    pub id: i64,
    pub name: String,
    pub trigger: Trigger,
    /// Map tile position; common events have none.
    pub position: Option<(i64, i64)>,
    pub pages: Vec<Page>,
}

/// All events of one `MapNNN.json` file.
#[derive(Debug)]
pub struct MapFile {
    pub id: i64,
    pub name: String,
    pub events: Vec<EventSource>,
}

/// Everything the parser hands to the processor.
#[derive(Debug)]
pub struct RawProject {
    pub tables: RefTables,
    pub maps: Vec<MapFile>,
    pub common_events: Vec<EventSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
}

/// Narrative record assembled from one event, later merged and rendered.
#[derive(Debug, Clone, Default)]
pub struct EventInfo {
    pub name: String,
    pub trigger: Trigger,
    pub position: Option<(i64, i64)>,
    pub dialogue: Vec<DialogueLine>,
    pub choices: Vec<String>,
    /// `(choice text, outcome labels joined with " -> ")` in discovery order.
    pub choice_outcomes: Vec<(String, String)>,
    pub conditions: Vec<String>,
    pub transfers: Vec<String>,
    pub variable_changes: Vec<String>,
    /// This event's own trigger condition, pre-rendered.
    pub trigger_condition: Option<String>,
    /// Trigger conditions of events that were merged into this one.
    pub trigger_conditions: Vec<String>,
}

impl EventInfo {
    /// An event with no narrative content is dropped from the output.
    pub fn has_content(&self) -> bool {
        !self.dialogue.is_empty()
            || !self.choices.is_empty()
            || !self.conditions.is_empty()
            || !self.transfers.is_empty()
            || !self.variable_changes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Map(i64),
    CommonEvent(i64),
}

/// One transcript section: a map's merged events, or a single common event.
#[derive(Debug)]
pub struct Section {
    pub kind: SectionKind,
    pub name: String,
    /// `(event label, info)` pairs in discovery order.
    pub events: Vec<(String, EventInfo)>,
}

/// One flattened, render-ready transcript entry.
#[derive(Debug)]
pub struct Row {
    pub kind: SectionKind,
    pub section: String,
    pub label: String,
    pub info: EventInfo,
}

/// The five id -> name reference tables, loaded once per run.
///
/// Missing keys resolve to a deterministic `"<kind> <id>"` fallback so the
/// pipeline never fails on a dangling reference.
#[derive(Debug, Default)]
pub struct RefTables {
    pub actors: HashMap<i64, String>,
    pub maps: HashMap<i64, String>,
    pub items: HashMap<i64, String>,
    pub variables: HashMap<i64, String>,
    pub switches: HashMap<i64, String>,
}

impl RefTables {
    fn lookup(table: &HashMap<i64, String>, kind: &str, id: i64) -> String {
        table
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("{kind} {id}"))
    }

    pub fn actor_label(&self, id: i64) -> String {
        Self::lookup(&self.actors, "actor", id)
    }

    pub fn map_label(&self, id: i64) -> String {
        Self::lookup(&self.maps, "map", id)
    }

    pub fn item_label(&self, id: i64) -> String {
        Self::lookup(&self.items, "item", id)
    }

    pub fn variable_label(&self, id: i64) -> String {
        Self::lookup(&self.variables, "variable", id)
    }

    pub fn switch_label(&self, id: i64) -> String {
        Self::lookup(&self.switches, "switch", id)
    }
}

/// Output toggles, all enabled by default (the original tool's
/// non-advanced path).
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub triggers: bool,
    pub variable_changes: bool,
    pub transfers: bool,
    pub choice_outcomes: bool,
    /// Nested under `triggers`: print the trigger-kind label itself.
    pub player_condition: bool,
    /// Nested under `triggers`: print the tile position on touch triggers.
    pub touch_details: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            triggers: true,
            variable_changes: true,
            transfers: true,
            choice_outcomes: true,
            player_condition: true,
            touch_details: true,
        }
    }
}

/// Run totals reported after the transcript is written.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub maps: usize,
    pub common_events: usize,
    pub events: usize,
    pub dialogue_lines: usize,
}
