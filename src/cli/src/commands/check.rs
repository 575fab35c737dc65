//! `garrison check`: evaluate a single access decision.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

use garrison_core::rbac::{GateDecision, Role, ScopeResolver};

use super::{parse_role, Workspace};
use crate::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum CheckCommands {
    /// Can the role open a page?
    Page {
        /// Session role
        #[arg(short, long, value_parser = parse_role)]
        role: Role,

        /// Route path, e.g. /admin/settings
        path: String,
    },

    /// Does the role see a menu entry?
    Menu {
        /// Session role
        #[arg(short, long, value_parser = parse_role)]
        role: Role,

        /// Menu id, e.g. users
        menu_id: String,
    },

    /// Can a session reach another unit's data?
    Unit {
        /// Session role
        #[arg(short, long, value_parser = parse_role)]
        role: Role,

        /// Session home unit ID
        #[arg(short, long)]
        unit: String,

        /// Target unit ID
        target: String,
    },
}

#[derive(Debug, Serialize)]
struct CheckReport {
    role: Role,
    subject: String,
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    matched: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl CheckReport {
    fn from_decision(role: Role, subject: String, matched: Option<String>, decision: GateDecision) -> Self {
        let (allowed, reason) = match decision {
            GateDecision::Allow => (true, None),
            GateDecision::Deny(reason) => (false, Some(reason)),
        };
        Self {
            role,
            subject,
            allowed,
            matched,
            reason,
        }
    }
}

pub fn execute(cmd: CheckCommands, ws: &Workspace, format: OutputFormat) -> Result<()> {
    let report = match cmd {
        CheckCommands::Page { role, path } => {
            let gate = ws.config.access.page_gate();
            let matched = gate.matching_key(&path).map(str::to_string);
            let decision = gate.decide(Some(role), &path);
            CheckReport::from_decision(role, path, matched, decision)
        }

        CheckCommands::Menu { role, menu_id } => {
            let gate = ws.config.access.menu_gate();
            let matched = gate.table().get(&menu_id).map(|_| menu_id.clone());
            let decision = gate.decide(Some(role), &menu_id);
            CheckReport::from_decision(role, menu_id, matched, decision)
        }

        CheckCommands::Unit { role, unit, target } => {
            let allowed = ScopeResolver::new(&ws.tree).can_access_unit(Some(role), &unit, &target);
            CheckReport {
                role,
                subject: format!("{} -> {}", unit, target),
                allowed,
                matched: None,
                reason: (!allowed).then(|| format!("{} is outside the scope of {} at {}", target, role, unit)),
            }
        }
    };

    match format {
        OutputFormat::Table => {
            let mut line = format!("{} {}", report.role, report.subject);
            if let Some(key) = &report.matched {
                line.push_str(&format!(" (rule: {})", key));
            }
            if report.allowed {
                output::print_allowed(&line);
            } else {
                output::print_denied(&line);
                if let Some(reason) = &report.reason {
                    output::print_detail("Reason", reason);
                }
            }
        }
        _ => output::print_item(&report, format)?,
    }

    Ok(())
}
