//! Decode raw `(code, parameters)` command objects and event objects into
//! the typed model.
//!
//! Decoding happens exactly once, here; the interpreter never touches a
//! positional parameter array. Unknown codes are dropped (narrative-only
//! scope), but malformed parameters on a *known* code are an error, which
//! aborts extraction of the containing file.

use anyhow::{Result, anyhow};
use serde_json::Value;

use crate::model::{EventCommand, EventSource, Page, PageCondition, Trigger, TriggerKind};

/// Decode one command. `Ok(None)` means "not narrative-relevant, skip".
pub fn decode_command(value: &Value) -> Result<Option<EventCommand>> {
    let code = value
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| anyhow!("command missing `code`"))?;
    let params = value.get("parameters").and_then(Value::as_array);
    let param = |i: usize| params.and_then(|p| p.get(i));

    let cmd = match code {
        101 => EventCommand::SpeakerHeader {
            speaker: param(4).and_then(Value::as_str).map(str::to_string),
        },
        401 => EventCommand::TextLine(
            param(0)
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow!("401 missing text parameter"))?
                .to_string(),
        ),
        102 => {
            let options = param(0)
                .and_then(Value::as_array)
                .ok_or_else(|| anyhow!("102 missing choice list"))?;
            EventCommand::ShowChoices(
                options
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            )
        }
        402 => EventCommand::ChoiceBranch(
            param(0)
                .and_then(Value::as_u64)
                .ok_or_else(|| anyhow!("402 missing choice index"))? as usize,
        ),
        111 => EventCommand::ConditionalBranch(stringify_operand(param(0))),
        201 => EventCommand::TransferPlayer {
            map_id: param(1)
                .and_then(Value::as_i64)
                .ok_or_else(|| anyhow!("201 missing map id"))?,
        },
        122 => EventCommand::ControlVariable {
            variable_id: param(0)
                .and_then(Value::as_i64)
                .ok_or_else(|| anyhow!("122 missing variable id"))?,
        },
        0 => EventCommand::BlockEnd,
        _ => return Ok(None),
    };
    Ok(Some(cmd))
}

/// The 111 operand is only ever described, never evaluated, so any JSON
/// value stringifies.
fn stringify_operand(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn decode_page(list: &Value) -> Result<Page> {
    let commands = list
        .as_array()
        .ok_or_else(|| anyhow!("page `list` is not an array"))?;
    let mut page = Page::new();
    for command in commands {
        if let Some(cmd) = decode_command(command)? {
            page.push(cmd);
        }
    }
    Ok(page)
}

/// A map event: `{name, pages: [{trigger, conditions, list}, ...]}`.
/// The id is the event's position in the map's `events` array.
pub fn decode_map_event(id: i64, value: &Value) -> Result<EventSource> {
    let pages_val = value
        .get("pages")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("map event has no `pages` array"))?;

    let mut pages = Vec::with_capacity(pages_val.len());
    for (i, page_val) in pages_val.iter().enumerate() {
        let list = page_val
            .get("list")
            .ok_or_else(|| anyhow!("page {i} has no `list`"))?;
        pages.push(decode_page(list)?);
    }

    // Trigger and conditions live on the pages; fall back to the first page
    // when the event object itself carries none.
    let first_page = pages_val.first();
    let trigger_code = value
        .get("trigger")
        .and_then(Value::as_i64)
        .or_else(|| first_page.and_then(|p| p.get("trigger")).and_then(Value::as_i64))
        .unwrap_or(0);
    let condition_val = value
        .get("condition")
        .or_else(|| first_page.and_then(|p| p.get("conditions")));

    let position = match (
        value.get("x").and_then(Value::as_i64),
        value.get("y").and_then(Value::as_i64),
    ) {
        (Some(x), Some(y)) => Some((x, y)),
        _ => None,
    };

    Ok(EventSource {
        id,
        name: value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        trigger: Trigger {
            kind: TriggerKind::from_code(trigger_code),
            condition: condition_val.map(decode_conditions).unwrap_or_default(),
        },
        position,
        pages,
    })
}

/// A common event: `{id, name, trigger, switchId, list}` with a single
/// implicit page.
pub fn decode_common_event(value: &Value) -> Result<EventSource> {
    let list = value
        .get("list")
        .ok_or_else(|| anyhow!("common event has no `list`"))?;
    let page = decode_page(list)?;

    // The switch gate is meaningless for trigger 0 ("none"); the exporter
    // still writes a default `switchId` there, so it must not count.
    let trigger_code = value.get("trigger").and_then(Value::as_i64).unwrap_or(0);
    let condition = PageCondition {
        switch1: if trigger_code != 0 {
            value.get("switchId").and_then(Value::as_i64)
        } else {
            None
        },
        ..PageCondition::default()
    };

    Ok(EventSource {
        id: value.get("id").and_then(Value::as_i64).unwrap_or(0),
        name: value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        trigger: Trigger {
            kind: TriggerKind::from_code(trigger_code),
            condition,
        },
        position: None,
        pages: vec![page],
    })
}

/// MV page conditions: each field counts only when its `*Valid` flag is
/// set. Loose forms without the flag gate on key presence instead.
fn decode_conditions(value: &Value) -> PageCondition {
    let gated = |valid: &str, id: &str| match value.get(valid).and_then(Value::as_bool) {
        Some(true) => value.get(id).and_then(Value::as_i64),
        Some(false) => None,
        None => value.get(id).and_then(Value::as_i64),
    };

    let variable = gated("variableValid", "variableId").map(|id| {
        (
            id,
            value
                .get("variableValue")
                .and_then(Value::as_i64)
                .unwrap_or(0),
        )
    });

    // `selfSwitchCh` defaults to "A" on every page, so key presence alone
    // means nothing here; the flag is required.
    let self_switch = match value.get("selfSwitchValid").and_then(Value::as_bool) {
        Some(true) => value
            .get("selfSwitchCh")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    };

    PageCondition {
        switch1: gated("switch1Valid", "switch1Id"),
        switch2: gated("switch2Valid", "switch2Id"),
        variable,
        self_switch,
        item: gated("itemValid", "itemId"),
        actor: gated("actorValid", "actorId"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_known_codes() {
        let test_cases = vec![
            (
                json!({"code": 101, "parameters": ["Face", 0, 0, 2, "Alice"]}),
                Some(EventCommand::SpeakerHeader {
                    speaker: Some("Alice".into()),
                }),
            ),
            (
                json!({"code": 101, "parameters": ["Face", 0, 0, 2]}),
                Some(EventCommand::SpeakerHeader { speaker: None }),
            ),
            (
                json!({"code": 401, "parameters": ["Hello"]}),
                Some(EventCommand::TextLine("Hello".into())),
            ),
            (
                json!({"code": 102, "parameters": [["Yes", "No"], 0]}),
                Some(EventCommand::ShowChoices(vec!["Yes".into(), "No".into()])),
            ),
            (
                json!({"code": 402, "parameters": [1, "No"]}),
                Some(EventCommand::ChoiceBranch(1)),
            ),
            (
                json!({"code": 111, "parameters": [4, 2, 0]}),
                Some(EventCommand::ConditionalBranch("4".into())),
            ),
            (
                json!({"code": 201, "parameters": [0, 17, 4, 8, 0, 0]}),
                Some(EventCommand::TransferPlayer { map_id: 17 }),
            ),
            (
                json!({"code": 122, "parameters": [2, 2, 0, 0, 5]}),
                Some(EventCommand::ControlVariable { variable_id: 2 }),
            ),
            (json!({"code": 0, "parameters": []}), Some(EventCommand::BlockEnd)),
            // narrative-irrelevant codes are dropped, not errors
            (json!({"code": 356, "parameters": ["plugin stuff"]}), None),
            (json!({"code": 250, "parameters": [{}]}), None),
        ];

        for (input, expected) in test_cases {
            let result = decode_command(&input).expect("decode");
            assert_eq!(result, expected, "input: {input}");
        }
    }

    #[test]
    fn malformed_known_code_is_an_error() {
        let bad = json!({"code": 401, "parameters": []});
        assert!(decode_command(&bad).is_err());
        let no_code = json!({"parameters": []});
        assert!(decode_command(&no_code).is_err());
    }

    #[test]
    fn map_event_takes_trigger_from_first_page() {
        let event = json!({
            "name": "Gate",
            "x": 5, "y": 3,
            "pages": [{
                "trigger": 3,
                "conditions": {
                    "switch1Valid": true, "switch1Id": 2,
                    "switch2Valid": false, "switch2Id": 9,
                    "selfSwitchValid": false, "selfSwitchCh": "A"
                },
                "list": [{"code": 401, "parameters": ["hi"]}, {"code": 0, "parameters": []}]
            }]
        });
        let src = decode_map_event(7, &event).unwrap();
        assert_eq!(src.id, 7);
        assert_eq!(src.trigger.kind, TriggerKind::Autorun);
        assert_eq!(src.trigger.condition.switch1, Some(2));
        assert_eq!(src.trigger.condition.switch2, None);
        assert_eq!(src.trigger.condition.self_switch, None);
        assert_eq!(src.position, Some((5, 3)));
        assert_eq!(src.pages.len(), 1);
        assert_eq!(src.pages[0].len(), 2);
    }

    #[test]
    fn common_event_gets_one_implicit_page() {
        let event = json!({
            "id": 4,
            "name": "Intro",
            "trigger": 1,
            "switchId": 3,
            "list": [{"code": 401, "parameters": ["hi"]}]
        });
        let src = decode_common_event(&event).unwrap();
        assert_eq!(src.id, 4);
        assert_eq!(src.pages.len(), 1);
        assert_eq!(src.trigger.kind, TriggerKind::PlayerTouch);
        assert_eq!(src.trigger.condition.switch1, Some(3));
        assert_eq!(src.position, None);
    }

    #[test]
    fn operand_stringifies_any_shape() {
        assert_eq!(stringify_operand(Some(&json!(3))), "3");
        assert_eq!(stringify_operand(Some(&json!("flag"))), "flag");
        assert_eq!(stringify_operand(Some(&json!(null))), "");
        assert_eq!(stringify_operand(None), "");
    }
}
