//! The organization tree: a flat list of unit records with parent pointers,
//! indexed once at construction for id lookup and child enumeration.
//!
//! Every lookup is total: unknown ids yield `None` or an empty collection,
//! never an error. Structural problems are rejected when the tree is built,
//! so traversals cannot loop.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use super::models::{Unit, UnitId};
use crate::error::{GarrisonError, Result};

/// Separator used when joining unit names into a breadcrumb.
pub const FULL_NAME_SEPARATOR: &str = " > ";

const SEED_UNITS: &str = include_str!("../../data/army_units.json");

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Structural defects that prevent a unit list from forming a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Duplicate unit id: {0}")]
    DuplicateUnit(String),

    #[error("Organization has no root unit")]
    MissingRoot,

    #[error("Organization has multiple root units: {0:?}")]
    MultipleRoots(Vec<String>),

    #[error("Parent chain of unit {0} forms a cycle")]
    Cycle(String),
}

/// On-disk shape of a unit file: `{ "units": [...] }` / `[[units]]`.
#[derive(Debug, Deserialize)]
struct UnitsDocument {
    units: Vec<Unit>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tree
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable organization tree.
#[derive(Debug, Clone)]
pub struct OrgTree {
    /// Unit records in insertion order.
    units: Vec<Unit>,

    /// Position of each unit in `units`.
    index: HashMap<UnitId, usize>,

    /// Positions of units without a parent.
    roots: Vec<usize>,

    /// Child positions keyed by parent id, in insertion order.
    children: HashMap<UnitId, Vec<usize>>,
}

impl OrgTree {
    /// Build a tree from unit records.
    ///
    /// Rejects duplicate ids, a missing or repeated root, and parent cycles.
    /// A `parent_id` that names no known unit is accepted with a warning; that
    /// branch is simply unreachable from the root.
    pub fn new(units: Vec<Unit>) -> std::result::Result<Self, TreeError> {
        let mut index = HashMap::with_capacity(units.len());
        for (pos, unit) in units.iter().enumerate() {
            if index.insert(unit.id.clone(), pos).is_some() {
                return Err(TreeError::DuplicateUnit(unit.id.to_string()));
            }
        }

        let roots: Vec<usize> = units
            .iter()
            .enumerate()
            .filter(|(_, u)| u.is_root())
            .map(|(pos, _)| pos)
            .collect();

        match roots.len() {
            0 => return Err(TreeError::MissingRoot),
            1 => {}
            _ => {
                return Err(TreeError::MultipleRoots(
                    roots.iter().map(|&pos| units[pos].id.to_string()).collect(),
                ))
            }
        }

        let mut children: HashMap<UnitId, Vec<usize>> = HashMap::new();
        for (pos, unit) in units.iter().enumerate() {
            let Some(parent_id) = &unit.parent_id else {
                continue;
            };
            if !index.contains_key(parent_id.as_str()) {
                warn!(
                    unit_id = %unit.id,
                    parent_id = %parent_id,
                    "Unit references unknown parent; branch is detached from the root"
                );
            }
            children.entry(parent_id.clone()).or_default().push(pos);
        }

        detect_cycles(&units, &index)?;

        debug!(
            units = units.len(),
            root = %units[roots[0]].id,
            "Organization tree built"
        );

        Ok(Self {
            units,
            index,
            roots,
            children,
        })
    }

    /// Parse a JSON document of the form `{ "units": [...] }` or a bare array.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let units: Vec<Unit> = if value.is_array() {
            serde_json::from_value(value)?
        } else {
            serde_json::from_value::<UnitsDocument>(value)?.units
        };
        Ok(Self::new(units)?)
    }

    /// Parse a TOML document with a `[[units]]` array.
    pub fn from_toml(text: &str) -> Result<Self> {
        let doc: UnitsDocument = toml::from_str(text)?;
        Ok(Self::new(doc.units)?)
    }

    /// Load a unit file, choosing the format by extension (`.toml`, otherwise JSON).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            GarrisonError::from(e).with_context("path", path.display().to_string())
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml(&text)
        } else {
            Self::from_json(&text)
        }
    }

    /// The bundled army organization used when no unit file is configured.
    pub fn seed() -> Result<Self> {
        Self::from_json(SEED_UNITS)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The single root unit.
    pub fn root(&self) -> &Unit {
        &self.units[self.roots[0]]
    }

    /// All units in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// All unit ids in insertion order.
    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.units.iter().map(|u| u.id.clone()).collect()
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.index.contains_key(unit_id)
    }

    /// Look up a unit by id.
    pub fn get(&self, unit_id: &str) -> Option<&Unit> {
        self.index.get(unit_id).map(|&pos| &self.units[pos])
    }

    /// Children of `parent_id`, or the top-level units when `None`.
    pub fn child_units(&self, parent_id: Option<&str>) -> Vec<&Unit> {
        let positions = match parent_id {
            None => Some(&self.roots),
            Some(id) => self.children.get(id),
        };
        positions
            .map(|ps| ps.iter().map(|&pos| &self.units[pos]).collect())
            .unwrap_or_default()
    }

    pub fn has_children(&self, unit_id: &str) -> bool {
        self.children.get(unit_id).is_some_and(|c| !c.is_empty())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Traversal
    // ─────────────────────────────────────────────────────────────────────────

    /// `unit_id` followed by all of its descendants, depth-first pre-order.
    ///
    /// Unknown ids yield an empty list.
    pub fn subordinate_unit_ids(&self, unit_id: &str) -> Vec<UnitId> {
        self.subtree_positions(unit_id)
            .into_iter()
            .map(|pos| self.units[pos].id.clone())
            .collect()
    }

    /// Every descendant of `unit_id`, excluding the unit itself.
    pub fn descendants(&self, unit_id: &str) -> Vec<&Unit> {
        self.subtree_positions(unit_id)
            .into_iter()
            .skip(1)
            .map(|pos| &self.units[pos])
            .collect()
    }

    /// `unit_id` followed by each ancestor up to and including the root.
    ///
    /// Stops early at a parent reference that names no known unit.
    pub fn parent_chain(&self, unit_id: &str) -> Vec<UnitId> {
        self.chain_positions(unit_id)
            .into_iter()
            .map(|pos| self.units[pos].id.clone())
            .collect()
    }

    /// Records from the root (or the highest reachable ancestor) down to `unit_id`.
    pub fn path(&self, unit_id: &str) -> Vec<&Unit> {
        let mut chain: Vec<&Unit> = self
            .chain_positions(unit_id)
            .into_iter()
            .map(|pos| &self.units[pos])
            .collect();
        chain.reverse();
        chain
    }

    /// Breadcrumb of names from the root to `unit_id`, e.g. `"Army HQ > I Corps"`.
    pub fn full_name(&self, unit_id: &str) -> String {
        self.path(unit_id)
            .iter()
            .map(|u| u.name.as_str())
            .collect::<Vec<_>>()
            .join(FULL_NAME_SEPARATOR)
    }

    /// Number of ancestors above `unit_id`; the root has depth 0.
    pub fn depth(&self, unit_id: &str) -> Option<usize> {
        let chain = self.chain_positions(unit_id);
        (!chain.is_empty()).then(|| chain.len() - 1)
    }

    /// Whether `unit_id` is `ancestor_id` or lies beneath it.
    pub fn is_within(&self, unit_id: &str, ancestor_id: &str) -> bool {
        self.chain_positions(unit_id)
            .into_iter()
            .any(|pos| self.units[pos].id == ancestor_id)
    }

    /// Keep the items whose unit lies within `ancestor_id`'s subtree.
    ///
    /// An empty `ancestor_id` means "no filter" and keeps everything.
    pub fn filter_within<'a, T, F>(&self, ancestor_id: &str, items: &'a [T], unit_of: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> &str,
    {
        if ancestor_id.is_empty() {
            return items.iter().collect();
        }
        let subtree: HashSet<UnitId> = self.subordinate_unit_ids(ancestor_id).into_iter().collect();
        items
            .iter()
            .filter(|item| subtree.contains(unit_of(*item)))
            .collect()
    }

    fn subtree_positions(&self, unit_id: &str) -> Vec<usize> {
        let Some(&start) = self.index.get(unit_id) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![start];

        while let Some(pos) = stack.pop() {
            if !seen.insert(pos) {
                continue;
            }
            out.push(pos);
            if let Some(kids) = self.children.get(self.units[pos].id.as_str()) {
                // Reverse so the first child is visited first.
                stack.extend(kids.iter().rev());
            }
        }
        out
    }

    fn chain_positions(&self, unit_id: &str) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cursor = self.index.get(unit_id).copied();

        while let Some(pos) = cursor {
            if out.len() > self.units.len() {
                break;
            }
            out.push(pos);
            cursor = self.units[pos]
                .parent_id
                .as_ref()
                .and_then(|p| self.index.get(p.as_str()).copied());
        }
        out
    }
}

fn detect_cycles(units: &[Unit], index: &HashMap<UnitId, usize>) -> std::result::Result<(), TreeError> {
    let mut settled: HashSet<usize> = HashSet::with_capacity(units.len());

    for start in 0..units.len() {
        let mut trail = Vec::new();
        let mut on_trail = HashSet::new();
        let mut cursor = Some(start);

        while let Some(pos) = cursor {
            if settled.contains(&pos) {
                break;
            }
            if !on_trail.insert(pos) {
                return Err(TreeError::Cycle(units[pos].id.to_string()));
            }
            trail.push(pos);
            cursor = units[pos]
                .parent_id
                .as_ref()
                .and_then(|p| index.get(p.as_str()).copied());
        }
        settled.extend(trail);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
