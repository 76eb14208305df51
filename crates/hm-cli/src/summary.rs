//! Tables and JSON printed by the `info` command.

use std::collections::BTreeMap;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use hm_model::{Category, Framework};
use hm_persistence::{CommandHistory, ProjectFile, ProjectInfo};
use serde::Serialize;

/// One table row per category: label, object count, comma-separated names.
pub fn category_rows(framework: &Framework) -> Vec<(String, usize, String)> {
    Category::ALL
        .iter()
        .map(|&category| {
            let names = framework.names(category);
            (category.label().to_string(), names.len(), names.join(", "))
        })
        .collect()
}

/// Machine-readable view of a loaded project, keyed by document section.
#[derive(Debug, Serialize)]
pub struct ProjectSummary<'a> {
    pub info: &'a ProjectInfo,
    pub history: &'a CommandHistory,
    pub objects: BTreeMap<&'static str, Vec<&'a str>>,
    pub boundary_types: BTreeMap<i32, &'a str>,
}

impl<'a> ProjectSummary<'a> {
    pub fn new(project: &'a ProjectFile) -> Self {
        let framework = &project.framework;
        Self {
            info: &project.info,
            history: &project.history,
            objects: Category::ALL
                .iter()
                .map(|&category| (category.section(), framework.names(category)))
                .collect(),
            boundary_types: framework
                .boundary_types
                .iter()
                .map(|btype| (btype.index, btype.name.as_str()))
                .collect(),
        }
    }
}

pub fn project_json(project: &ProjectFile) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ProjectSummary::new(project))
}

pub fn print_project(project: &ProjectFile) {
    println!("Format version: {}", project.info.format_version);
    println!("Created: {}", project.info.created_at);
    println!("Last saved: {}", project.info.last_saved_at);
    println!(
        "Commands: {} ({} applied)",
        project.history.len(),
        project.history.applied().len()
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Objects"),
        header_cell("Names"),
    ]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for (label, count, names) in category_rows(&project.framework) {
        let names = if names.is_empty() {
            Cell::new("-").fg(Color::DarkGrey)
        } else {
            Cell::new(names)
        };
        table.add_row(vec![Cell::new(label), Cell::new(count), names]);
    }
    println!("{table}");

    let boundary_types = &project.framework.boundary_types;
    if boundary_types.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Boundary"), header_cell("Name")]);
    apply_table_style(&mut table);
    for btype in boundary_types.iter() {
        table.add_row(vec![Cell::new(btype.index), Cell::new(&btype.name)]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hm_model::Grid2D;

    #[test]
    fn test_category_rows() {
        let mut framework = Framework::new();
        framework
            .add_grid2d("a", Grid2D::rectangle(0.0, 0.0, 1.0, 1.0, 1, 1))
            .unwrap();
        framework
            .add_grid2d("b", Grid2D::rectangle(1.0, 0.0, 1.0, 1.0, 1, 1))
            .unwrap();

        let rows = category_rows(&framework);
        assert_eq!(rows.len(), 4);
        let grids = rows.iter().find(|(_, count, _)| *count == 2).unwrap();
        assert_eq!(grids.0, Category::Grid2d.label());
        assert_eq!(grids.2, "a, b");
        assert!(
            rows.iter()
                .filter(|row| row.0 != grids.0)
                .all(|(_, count, names)| *count == 0 && names.is_empty())
        );
    }

    #[test]
    fn test_project_json() {
        let mut framework = Framework::new();
        framework
            .add_grid2d("a", Grid2D::rectangle(0.0, 0.0, 1.0, 1.0, 1, 1))
            .unwrap();
        framework.boundary_types.insert(3, "inlet");
        let mut project = ProjectFile::new(framework);
        project.history.push(hm_persistence::CommandRecord::new(
            "AddRectGrid",
            serde_json::json!({"nx": 1}),
        ));

        let value: serde_json::Value =
            serde_json::from_str(&project_json(&project).unwrap()).unwrap();
        assert_eq!(value["objects"]["GRID2D"], serde_json::json!(["a"]));
        assert_eq!(value["objects"]["CONTOUR2D"], serde_json::json!([]));
        assert_eq!(value["boundary_types"]["3"], "inlet");

        let info: ProjectInfo = serde_json::from_value(value["info"].clone()).unwrap();
        assert_eq!(info, project.info);
        let history: CommandHistory = serde_json::from_value(value["history"].clone()).unwrap();
        assert_eq!(history, project.history);
    }
}
