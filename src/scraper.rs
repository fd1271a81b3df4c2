use crate::config::Markers;
use color_eyre::{Result, eyre::eyre};
use indexmap::IndexMap;
use log::{debug, trace, warn};
use scraper::{ElementRef, Html, Selector};

pub type GroupId = String;
pub type ItemId = String;
pub type ItemSequence = Vec<ItemId>;

/// Group id → item ids, both in document order.
///
/// A repeated group id replaces the earlier group's items but keeps the
/// position where the id was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    groups: IndexMap<GroupId, ItemSequence>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sequence this group replaced, if any.
    pub fn insert(&mut self, group: GroupId, items: ItemSequence) -> Option<ItemSequence> {
        self.groups.insert(group, items)
    }

    pub fn get(&self, group: &str) -> Option<&ItemSequence> {
        self.groups.get(group)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&GroupId, &ItemSequence)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_items(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

impl<G, I> FromIterator<(G, Vec<I>)> for CatalogSnapshot
where
    G: Into<GroupId>,
    I: Into<ItemId>,
{
    fn from_iter<T: IntoIterator<Item = (G, Vec<I>)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for (group, items) in iter {
            snapshot.insert(group.into(), items.into_iter().map(Into::into).collect());
        }
        snapshot
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| eyre!("invalid selector {selector:?}: {e}"))
}

/// Turns capture markup into a [`CatalogSnapshot`] using precompiled markers.
#[derive(Debug)]
pub struct Extractor {
    group: Selector,
    item: Selector,
    group_attr: String,
    item_attr: String,
}

impl Extractor {
    pub fn new(markers: &Markers) -> Result<Self> {
        Ok(Self {
            group: compile(&markers.group_selector)?,
            item: compile(&markers.item_selector)?,
            group_attr: markers.group_attr.clone(),
            item_attr: markers.item_attr.clone(),
        })
    }

    /// Parses `html` as a full HTML5 document.
    ///
    /// The tree builder reparents misnested table content: elements sitting
    /// directly in a `<tr>` move in front of the table, and rows outside any
    /// `<table>` lose their row tags. Groups and items are matched in that
    /// rebuilt tree, not in the markup as written.
    pub fn extract(&self, html: &str) -> CatalogSnapshot {
        let document = Html::parse_document(html);
        if !document.errors.is_empty() {
            debug!("Recovered from {} markup errors", document.errors.len());
        }

        let mut snapshot = CatalogSnapshot::new();
        for group in document.select(&self.group) {
            let Some(group_id) = non_empty_attr(&group, &self.group_attr) else {
                trace!("Skipping group without {}", self.group_attr);
                continue;
            };

            let items = self.parse_items(group);
            if snapshot.insert(group_id.to_string(), items).is_some() {
                warn!("Group {group_id} appears more than once; keeping the later block");
            }
        }

        snapshot
    }

    fn parse_items(&self, group: ElementRef) -> ItemSequence {
        group
            .select(&self.item)
            .filter_map(|item| {
                let id = non_empty_attr(&item, &self.item_attr);
                if id.is_none() {
                    trace!("Skipping item without {}", self.item_attr);
                }
                id.map(String::from)
            })
            .collect()
    }
}

fn non_empty_attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).filter(|value| !value.is_empty())
}
