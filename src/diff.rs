use std::collections::{BTreeSet, HashSet};

use crate::scraper::{CatalogSnapshot, GroupId, ItemId};
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use indexmap::IndexMap;
use log::debug;
use strum_macros::Display;

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Deleted,
}

/// Items immediately before and after an item in its group's document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub previous: Option<ItemId>,
    pub next: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub item: ItemId,
    pub neighbors: Neighbors,
}

pub type GroupChanges = IndexMap<GroupId, Vec<Change>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub total_newer: usize,
    pub total_older: usize,
    pub added: GroupChanges,
    pub deleted: GroupChanges,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }

    pub fn changes(&self, kind: ChangeKind) -> &GroupChanges {
        match kind {
            ChangeKind::Added => &self.added,
            ChangeKind::Deleted => &self.deleted,
        }
    }
}

/// Looks up `item` at its first position in `items`.
pub fn neighbors(items: &[ItemId], item: &str) -> Result<Neighbors> {
    let index = items
        .iter()
        .position(|candidate| candidate == item)
        .ok_or_else(|| eyre!("item {item} not found in its group"))?;

    Ok(Neighbors {
        previous: index.checked_sub(1).map(|i| items[i].clone()),
        next: items.get(index + 1).cloned(),
    })
}

/// Items of each `from` group that the same group in `against` lacks, sorted
/// by id, with neighbors taken from the `from` list.
fn missing_from(from: &CatalogSnapshot, against: &CatalogSnapshot) -> Result<GroupChanges> {
    let mut changes = GroupChanges::new();

    for (group, items) in from.groups() {
        let present: HashSet<&str> = against
            .get(group)
            .map(|other| other.iter().map(String::as_str).collect())
            .unwrap_or_default();

        let missing: BTreeSet<&str> = items
            .iter()
            .map(String::as_str)
            .filter(|item| !present.contains(item))
            .collect();
        if missing.is_empty() {
            continue;
        }

        let group_changes = missing
            .into_iter()
            .map(|item| -> Result<Change> {
                Ok(Change {
                    item: item.to_string(),
                    neighbors: neighbors(items, item)
                        .wrap_err_with(|| format!("broken diff for group {group}"))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        changes.insert(group.clone(), group_changes);
    }

    Ok(changes)
}

pub fn compute_diff(old: &CatalogSnapshot, new: &CatalogSnapshot) -> Result<SnapshotDiff> {
    let diff = SnapshotDiff {
        total_newer: new.total_items(),
        total_older: old.total_items(),
        added: missing_from(new, old)?,
        deleted: missing_from(old, new)?,
    };

    debug!(
        "Found {} groups with additions, {} groups with deletions",
        diff.added.len(),
        diff.deleted.len()
    );
    Ok(diff)
}
