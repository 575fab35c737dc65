//! `garrison select`: replay picks through the cascading unit selector.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::*;
use serde::Serialize;
use std::cell::RefCell;

use garrison_core::error::GarrisonError;
use garrison_core::rbac::Role;
use garrison_core::selector::{CascadeSelector, SelectorLevel};

use super::{parse_role, Workspace};
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct SelectArgs {
    /// Start level 0 below this unit
    #[arg(long, conflicts_with = "role")]
    anchor: Option<String>,

    /// Initial value (selected unit ID)
    #[arg(long)]
    value: Option<String>,

    /// Build the picker a session would get (requires --unit)
    #[arg(short, long, value_parser = parse_role, requires = "unit")]
    role: Option<Role>,

    /// Session home unit ID
    #[arg(short, long, requires = "role")]
    unit: Option<String>,

    /// A pick as `<level>:<unit-id>`; `<level>:` clears that level. Applied in order.
    #[arg(short, long = "pick", value_name = "LEVEL:ID")]
    picks: Vec<String>,
}

enum Step {
    Select(usize, String),
    Clear(usize),
}

impl Step {
    fn parse(raw: &str) -> Result<Self> {
        let (level, id) = raw
            .split_once(':')
            .with_context(|| format!("Pick '{}' must look like <level>:<unit-id>", raw))?;
        let level: usize = level
            .trim()
            .parse()
            .with_context(|| format!("Pick '{}' has a non-numeric level", raw))?;
        let id = id.trim();
        Ok(if id.is_empty() {
            Self::Clear(level)
        } else {
            Self::Select(level, id.to_string())
        })
    }

    fn describe(&self) -> String {
        match self {
            Self::Select(level, id) => format!("select {} at level {}", id, level),
            Self::Clear(level) => format!("clear level {}", level),
        }
    }
}

#[derive(Debug, Serialize)]
struct LevelView {
    level: usize,
    options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected: Option<String>,
}

impl From<&SelectorLevel<'_>> for LevelView {
    fn from(level: &SelectorLevel<'_>) -> Self {
        Self {
            level: level.level,
            options: level.options.iter().map(|u| u.id.to_string()).collect(),
            selected: level.selected.as_ref().map(|id| id.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct StepView {
    action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    emitted: Option<String>,
    levels: Vec<LevelView>,
}

#[derive(Debug, Serialize)]
struct SelectReport {
    fixed: bool,
    steps: Vec<StepView>,
    value: String,
    display_path: String,
}

pub fn execute(args: SelectArgs, ws: &Workspace, format: OutputFormat) -> Result<()> {
    let steps = args
        .picks
        .iter()
        .map(|raw| Step::parse(raw))
        .collect::<Result<Vec<_>>>()?;

    let emitted: RefCell<Vec<String>> = RefCell::new(Vec::new());

    let mut selector = match (&args.role, &args.unit) {
        (Some(role), Some(unit)) => CascadeSelector::for_session(&ws.tree, Some(*role), unit),
        (None, None) => {
            let mut selector = CascadeSelector::new(&ws.tree);
            if let Some(anchor) = &args.anchor {
                super::units::find(&ws.tree, anchor)?;
                selector = selector.anchored_at(anchor.as_str());
            }
            selector
        }
        _ => bail!("--role and --unit must be given together"),
    };
    if let Some(value) = &args.value {
        selector.set_value(value);
    }
    let mut selector = selector.on_change(|id| emitted.borrow_mut().push(id.to_string()));

    let snapshot = |selector: &CascadeSelector<'_>| -> Vec<LevelView> {
        selector.levels().iter().map(LevelView::from).collect()
    };

    let mut views = vec![StepView {
        action: "initial".to_string(),
        emitted: None,
        levels: snapshot(&selector),
    }];

    for step in &steps {
        let before = emitted.borrow().len();
        match step {
            Step::Select(level, id) => selector.select(*level, id).map(|_| ()),
            Step::Clear(level) => selector.clear(*level).map(|_| ()),
        }
        .map_err(GarrisonError::from)
        .with_context(|| format!("Cannot {}", step.describe()))?;

        views.push(StepView {
            action: step.describe(),
            emitted: emitted.borrow().get(before).cloned(),
            levels: snapshot(&selector),
        });
    }

    let report = SelectReport {
        fixed: selector.is_fixed(),
        steps: views,
        value: selector.value().to_string(),
        display_path: selector.display_path(),
    };

    match format {
        OutputFormat::Table => print_steps(&report),
        _ => output::print_item(&report, format)?,
    }

    Ok(())
}

fn print_steps(report: &SelectReport) {
    for step in &report.steps {
        output::print_header(&step.action);
        if let Some(value) = &step.emitted {
            let shown = if value.is_empty() { "\"\"" } else { value.as_str() };
            output::print_detail("on_change", shown);
        }
        for level in &step.levels {
            let options: Vec<String> = level
                .options
                .iter()
                .map(|id| {
                    if level.selected.as_deref() == Some(id.as_str()) {
                        format!("[{}]", id).green().bold().to_string()
                    } else {
                        id.clone()
                    }
                })
                .collect();
            output::print_detail(&format!("Level {}", level.level), &options.join("  "));
        }
    }

    println!();
    if report.fixed {
        output::print_info("Picker is fixed.");
    }
    if report.value.is_empty() {
        output::print_info("Nothing selected.");
    } else {
        output::print_info(&format!("Selected {} ({})", report.value, report.display_path));
    }
}
