//! Project metadata sections of the `FLOW` element.
//!
//! ```text
//! FLOW
//! ├── INFO       FORMAT_VERSION, CREATED, SAVED
//! ├── COMMANDS   current="N", one COM (NAME, ARGS as JSON) per command
//! └── STATE
//!     └── BTYPES one BTYPE (index, name) per boundary type
//! ```

use hm_engine::ROOT_TAG;
use hm_engine::tree::Element;
use hm_model::BoundaryTypes;
use serde_json::Value;

use crate::error::{PersistenceError, Result};
use crate::types::{CommandHistory, CommandRecord, ProjectFile, ProjectInfo};

pub(crate) const FLOW: &str = "FLOW";
const INFO: &str = "INFO";
const COMMANDS: &str = "COMMANDS";
const STATE: &str = "STATE";
const BTYPES: &str = "BTYPES";

/// Document holding the project metadata and an empty geometry section.
pub(crate) fn project_skeleton(project: &ProjectFile) -> Result<Element> {
    let state =
        Element::new(STATE).with_child(btypes_element(&project.framework.boundary_types));
    let flow = Element::new(FLOW)
        .with_child(info_element(&project.info))
        .with_child(commands_element(&project.history)?)
        .with_child(state);
    Ok(Element::new(ROOT_TAG).with_child(flow))
}

fn info_element(info: &ProjectInfo) -> Element {
    Element::new(INFO)
        .with_child(Element::new("FORMAT_VERSION").with_text(&info.format_version))
        .with_child(Element::new("CREATED").with_text(&info.created_at))
        .with_child(Element::new("SAVED").with_text(&info.last_saved_at))
}

fn commands_element(history: &CommandHistory) -> Result<Element> {
    let mut element =
        Element::new(COMMANDS).with_attribute("current", history.current.to_string());
    for record in &history.commands {
        let arguments = serde_json::to_string(&record.arguments)
            .map_err(|e| PersistenceError::metadata("ARGS", e.to_string()))?;
        element.push(
            Element::new("COM")
                .with_child(Element::new("NAME").with_text(&record.name))
                .with_child(Element::new("ARGS").with_text(arguments)),
        );
    }
    Ok(element)
}

fn btypes_element(boundary_types: &BoundaryTypes) -> Element {
    let mut element = Element::new(BTYPES);
    for btype in boundary_types.iter() {
        element.push(
            Element::new("BTYPE")
                .with_attribute("index", btype.index.to_string())
                .with_attribute("name", &btype.name),
        );
    }
    element
}

/// Read project info; a missing section yields a fresh one.
pub(crate) fn parse_info(flow: &Element) -> Result<ProjectInfo> {
    let Some(info) = flow.child(INFO) else {
        return Ok(ProjectInfo::default());
    };
    let field = |name: &str| {
        info.child(name)
            .map(|e| e.text.trim().to_string())
            .ok_or_else(|| PersistenceError::metadata(INFO, format!("missing <{name}>")))
    };
    Ok(ProjectInfo {
        format_version: field("FORMAT_VERSION")?,
        created_at: field("CREATED")?,
        last_saved_at: field("SAVED")?,
    })
}

/// Read the command history; a missing section yields an empty one.
pub(crate) fn parse_commands(flow: &Element) -> Result<CommandHistory> {
    let Some(element) = flow.child(COMMANDS) else {
        return Ok(CommandHistory::default());
    };

    let mut commands = Vec::new();
    for com in element.children_named("COM") {
        let name = com
            .child("NAME")
            .map(|e| e.text.trim().to_string())
            .ok_or_else(|| PersistenceError::metadata(COMMANDS, "command without <NAME>"))?;
        let arguments = match com.child("ARGS").map(|e| e.text.trim()) {
            None | Some("") => Value::Null,
            Some(text) => serde_json::from_str(text).map_err(|e| {
                PersistenceError::metadata(COMMANDS, format!("arguments of '{name}': {e}"))
            })?,
        };
        commands.push(CommandRecord { name, arguments });
    }

    let current = match element.attribute("current") {
        None => commands.len(),
        Some(text) => text.trim().parse::<usize>().map_err(|_| {
            PersistenceError::metadata(COMMANDS, format!("invalid current position '{text}'"))
        })?,
    };
    if current > commands.len() {
        return Err(PersistenceError::metadata(
            COMMANDS,
            format!("current position {current} beyond {} commands", commands.len()),
        ));
    }
    Ok(CommandHistory { commands, current })
}

/// Read the boundary type table from `FLOW/STATE/BTYPES`, if present.
pub(crate) fn parse_btypes(flow: &Element) -> Result<BoundaryTypes> {
    let mut boundary_types = BoundaryTypes::new();
    let Some(element) = flow.child(STATE).and_then(|state| state.child(BTYPES)) else {
        return Ok(boundary_types);
    };
    for btype in element.children_named("BTYPE") {
        let index = btype
            .attribute("index")
            .and_then(|v| v.trim().parse::<i32>().ok())
            .ok_or_else(|| PersistenceError::metadata(BTYPES, "missing or invalid index"))?;
        let name = btype.attribute("name").ok_or_else(|| {
            PersistenceError::metadata(BTYPES, format!("type {index} has no name"))
        })?;
        boundary_types.insert(index, name);
    }
    Ok(boundary_types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flow_of(project: &ProjectFile) -> Element {
        let root = project_skeleton(project).unwrap();
        let xml = root.to_xml().unwrap();
        Element::parse(&xml).unwrap().child(FLOW).unwrap().clone()
    }

    #[test]
    fn test_metadata_round_trip() {
        let mut project = ProjectFile::default();
        project
            .history
            .push(CommandRecord::new("AddRectGrid", json!({"p0": [0, 0], "name": "a<b>"})));
        project.history.push(CommandRecord::new("Undoable", Value::Null));
        project.history.current = 1;
        project.framework.boundary_types.insert(1, "wall & inlet");
        project.framework.boundary_types.insert(-2, "sym");

        let flow = flow_of(&project);
        assert_eq!(parse_info(&flow).unwrap(), project.info);
        assert_eq!(parse_commands(&flow).unwrap(), project.history);
        assert_eq!(parse_btypes(&flow).unwrap(), project.framework.boundary_types);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let flow = Element::new(FLOW);
        assert!(parse_commands(&flow).unwrap().is_empty());
        assert!(parse_btypes(&flow).unwrap().is_empty());
        assert!(parse_info(&flow).is_ok());
    }

    #[test]
    fn test_invalid_current_position() {
        let flow = Element::new(FLOW).with_child(
            Element::new(COMMANDS).with_attribute("current", "3").with_child(
                Element::new("COM").with_child(Element::new("NAME").with_text("A")),
            ),
        );
        assert!(matches!(
            parse_commands(&flow),
            Err(PersistenceError::InvalidMetadata { element: "COMMANDS", .. })
        ));
    }

    #[test]
    fn test_invalid_btype_index() {
        let flow = Element::new(FLOW).with_child(Element::new(STATE).with_child(
            Element::new(BTYPES).with_child(
                Element::new("BTYPE")
                    .with_attribute("index", "x")
                    .with_attribute("name", "wall"),
            ),
        ));
        assert!(parse_btypes(&flow).is_err());
    }
}
