//! Organization tree inspection commands.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use garrison_core::error::GarrisonError;
use garrison_core::org::{OrgTree, Unit};

use super::Workspace;
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum UnitsCommands {
    /// Print the whole organization as an indented tree
    Tree,

    /// Show a single unit
    Show {
        /// Unit ID
        unit_id: String,
    },

    /// List the direct children of a unit (the top-level units when omitted)
    Children {
        /// Parent unit ID
        unit_id: Option<String>,
    },

    /// List every unit below a unit
    Descendants {
        /// Ancestor unit ID
        unit_id: String,
    },
}

// ── Output types ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Tabled)]
pub struct UnitRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Level")]
    pub level: String,
    #[tabled(rename = "Parent")]
    pub parent: String,
    #[tabled(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<u8>,
    #[tabled(rename = "Risk")]
    #[serde(skip)]
    pub risk_display: String,
}

impl UnitRow {
    pub fn from_unit(unit: &Unit) -> Self {
        Self {
            id: unit.id.to_string(),
            name: unit.name.clone(),
            level: unit.level.map(|l| l.label().to_string()).unwrap_or_default(),
            parent: unit
                .parent_id
                .as_ref()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            risk: unit.risk,
            risk_display: output::risk_cell(unit.risk),
        }
    }

    /// Same row with the name indented by tree depth.
    fn indented(unit: &Unit, depth: usize) -> Self {
        let mut row = Self::from_unit(unit);
        if depth > 0 {
            row.name = format!("{}└ {}", "  ".repeat(depth - 1), row.name);
        }
        row
    }
}

#[derive(Debug, Serialize)]
struct UnitDetail<'a> {
    #[serde(flatten)]
    unit: &'a Unit,
    full_name: String,
    depth: usize,
    children: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    risk_band: Option<String>,
}

// ── Execution ───────────────────────────────────────────────────────────────

pub fn execute(cmd: UnitsCommands, ws: &Workspace, format: OutputFormat) -> Result<()> {
    let tree = &ws.tree;

    match cmd {
        UnitsCommands::Tree => {
            let mut rows = Vec::with_capacity(tree.len());
            push_subtree(tree, tree.root(), 0, &mut rows);
            output::print_list(&rows, format)?;
        }

        UnitsCommands::Show { unit_id } => {
            let unit = find(tree, &unit_id)?;
            let detail = UnitDetail {
                unit,
                full_name: tree.full_name(&unit_id),
                depth: tree.depth(&unit_id).unwrap_or_default(),
                children: tree.child_units(Some(&unit_id)).len(),
                risk_band: unit.risk_band().map(|b| b.label().to_string()),
            };

            match format {
                OutputFormat::Table => {
                    output::print_header(&format!("Unit: {}", unit.name));
                    output::print_detail("ID", unit.id.as_str());
                    output::print_detail("Full Name", &detail.full_name);
                    if let Some(level) = unit.level {
                        output::print_detail("Level", level.label());
                    }
                    if let Some(unit_type) = &unit.unit_type {
                        output::print_detail("Type", unit_type);
                    }
                    if let Some(region) = &unit.region {
                        output::print_detail("Region", region);
                    }
                    output::print_detail("Risk", &output::risk_cell(unit.risk));
                    output::print_detail("Depth", &detail.depth.to_string());
                    output::print_detail("Children", &detail.children.to_string());
                }
                _ => output::print_item(&detail, format)?,
            }
        }

        UnitsCommands::Children { unit_id } => {
            if let Some(id) = &unit_id {
                find(tree, id)?;
            }
            let rows: Vec<UnitRow> = tree
                .child_units(unit_id.as_deref())
                .into_iter()
                .map(UnitRow::from_unit)
                .collect();
            output::print_list(&rows, format)?;
        }

        UnitsCommands::Descendants { unit_id } => {
            find(tree, &unit_id)?;
            let rows: Vec<UnitRow> = tree
                .descendants(&unit_id)
                .into_iter()
                .map(UnitRow::from_unit)
                .collect();
            output::print_list(&rows, format)?;
        }
    }

    Ok(())
}

pub fn find<'t>(tree: &'t OrgTree, unit_id: &str) -> Result<&'t Unit> {
    tree.get(unit_id)
        .ok_or_else(|| GarrisonError::unit_not_found(unit_id).into())
}

fn push_subtree(tree: &OrgTree, unit: &Unit, depth: usize, rows: &mut Vec<UnitRow>) {
    rows.push(UnitRow::indented(unit, depth));
    for child in tree.child_units(Some(unit.id.as_str())) {
        push_subtree(tree, child, depth + 1, rows);
    }
}
