//! Assembles one `EventInfo` per `EventSource`.

use super::interpreter::{Interpreter, OutcomeMap};
use crate::model::{EventInfo, EventSource, RefTables};

/// Interpret every page of `event` into a single narrative record.
///
/// Interpreter state is page-scoped (a fresh one per page); the choice
/// outcome map spans all pages. Events with no narrative content yield
/// `None` and are dropped from the output.
pub fn build_event_info(event: &EventSource, tables: &RefTables) -> Option<EventInfo> {
    let mut info = EventInfo {
        name: event.name.clone(),
        trigger: event.trigger.clone(),
        position: event.position,
        ..EventInfo::default()
    };

    let mut outcomes = OutcomeMap::default();
    for (i, page) in event.pages.iter().enumerate() {
        let mut interp = Interpreter::new(tables);
        interp.run_page(i + 1, page, &mut info, &mut outcomes);
    }
    info.choice_outcomes = outcomes.into_joined();
    info.trigger_condition = event.trigger.condition.describe(tables);

    if info.has_content() { Some(info) } else { None }
}
