//! `garrison scope`: the units a role at a home unit may see.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use garrison_core::rbac::{Role, ScopeResolver};

use super::units::UnitRow;
use super::{parse_role, Workspace};
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct ScopeArgs {
    /// Session role (ROLE_HQ, ROLE_DIV, ROLE_BN)
    #[arg(short, long, value_parser = parse_role)]
    role: Role,

    /// Home unit ID
    #[arg(short, long)]
    unit: String,
}

#[derive(Debug, Serialize)]
struct ScopeReport {
    role: Role,
    home_unit_id: String,
    is_fixed: bool,
    units: Vec<UnitRow>,
}

pub fn execute(args: ScopeArgs, ws: &Workspace, format: OutputFormat) -> Result<()> {
    let resolver = ScopeResolver::new(&ws.tree);
    let selectable = resolver.selectable_units(Some(args.role), &args.unit);

    let report = ScopeReport {
        role: args.role,
        home_unit_id: args.unit,
        is_fixed: selectable.is_fixed,
        units: selectable.units.into_iter().map(UnitRow::from_unit).collect(),
    };

    match format {
        OutputFormat::Table => {
            output::print_header(&format!(
                "{} ({}) at {}: {}",
                report.role.label(),
                report.role,
                report.home_unit_id,
                report.role.scope_label()
            ));
            if report.units.is_empty() {
                output::print_info("Home unit is not in the organization; nothing is visible.");
                return Ok(());
            }
            output::print_list(&report.units, format)?;
            if report.is_fixed {
                output::print_info("Unit picker is fixed to the home unit.");
            }
        }
        _ => output::print_item(&report, format)?,
    }

    Ok(())
}
