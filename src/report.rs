use std::io::{self, Write};
use std::path::Path;

use crate::diff::{ChangeKind, SnapshotDiff};
use crate::scraper::{CatalogSnapshot, ItemId};
use crate::storage::CapturePair;

const RULE: &str = "##########";
const NONE: &str = "None";

fn format_items(items: &[ItemId]) -> String {
    let quoted: Vec<_> = items.iter().map(|item| format!("'{item}'")).collect();
    format!("[{}]", quoted.join(", "))
}

fn or_none(item: Option<&ItemId>) -> &str {
    item.map_or(NONE, String::as_str)
}

fn render_listing(
    out: &mut impl Write,
    label: &str,
    path: &Path,
    snapshot: &CatalogSnapshot,
    numbered: bool,
) -> io::Result<()> {
    writeln!(
        out,
        "Shop-group-row and product counts in HTML ({label}) {}:",
        path.display()
    )?;
    for (i, (group, items)) in snapshot.groups().enumerate() {
        let prefix = if numbered {
            format!("{} ", i + 1)
        } else {
            String::new()
        };
        writeln!(
            out,
            "{prefix}Producer ID: {group}, \nProduct Count: {}, Product IDs: {}\n",
            items.len(),
            format_items(items)
        )?;
    }
    Ok(())
}

fn render_changes(out: &mut impl Write, diff: &SnapshotDiff, kind: ChangeKind) -> io::Result<()> {
    let changes = diff.changes(kind);
    if changes.is_empty() {
        return writeln!(out, "{NONE}");
    }

    for (group, group_changes) in changes {
        for change in group_changes {
            writeln!(
                out,
                "\nProducer ID: {group}, \n{kind} Product ID: {}, \nPrevious: {}, \nNext: {}",
                change.item,
                or_none(change.neighbors.previous.as_ref()),
                or_none(change.neighbors.next.as_ref()),
            )?;
        }
    }
    Ok(())
}

/// Writes the full comparison report for one pair of captures.
pub fn render(
    out: &mut impl Write,
    pair: &CapturePair,
    newer: &CatalogSnapshot,
    older: &CatalogSnapshot,
    diff: &SnapshotDiff,
) -> io::Result<()> {
    let (newer_path, older_path) = (pair.newer.display(), pair.older.display());

    writeln!(out, "Base file: {older_path}")?;
    writeln!(out, "Compared file: {newer_path}")?;

    writeln!(
        out,
        "\nTotal Product Count in HTML (newer) {newer_path}: {}",
        diff.total_newer
    )?;
    writeln!(
        out,
        "Total Product Count in HTML (older) {older_path}: {}\n",
        diff.total_older
    )?;

    writeln!(out, "\n{RULE}")?;
    render_listing(out, "newer", &pair.newer, newer, false)?;
    writeln!(out)?;
    render_listing(out, "older", &pair.older, older, true)?;

    writeln!(out, "\n\n{RULE}")?;
    writeln!(
        out,
        "\"{older_path}\" >>> {newer_path} (latest): added product list:"
    )?;
    render_changes(out, diff, ChangeKind::Added)?;

    writeln!(out, "\n{RULE}")?;
    writeln!(out, "\"{newer_path}\" (latest): deleted product list:")?;
    render_changes(out, diff, ChangeKind::Deleted)?;

    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_diff;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn pair() -> CapturePair {
        CapturePair {
            newer: PathBuf::from("new.html"),
            older: PathBuf::from("old.html"),
        }
    }

    fn render_to_string(newer: &CatalogSnapshot, older: &CatalogSnapshot) -> String {
        let diff = compute_diff(older, newer).unwrap();
        let mut out = Vec::new();
        render(&mut out, &pair(), newer, older, &diff).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_full_report() {
        let newer: CatalogSnapshot = [("P1", vec!["A", "B", "C"]), ("P3", vec!["Z"])]
            .into_iter()
            .collect();
        let older: CatalogSnapshot = [("P1", vec!["A", "C", "D"])].into_iter().collect();

        let expected = concat!(
            "Base file: old.html\n",
            "Compared file: new.html\n",
            "\n",
            "Total Product Count in HTML (newer) new.html: 4\n",
            "Total Product Count in HTML (older) old.html: 3\n",
            "\n",
            "\n",
            "##########\n",
            "Shop-group-row and product counts in HTML (newer) new.html:\n",
            "Producer ID: P1, \n",
            "Product Count: 3, Product IDs: ['A', 'B', 'C']\n",
            "\n",
            "Producer ID: P3, \n",
            "Product Count: 1, Product IDs: ['Z']\n",
            "\n",
            "\n",
            "Shop-group-row and product counts in HTML (older) old.html:\n",
            "1 Producer ID: P1, \n",
            "Product Count: 3, Product IDs: ['A', 'C', 'D']\n",
            "\n",
            "\n",
            "\n",
            "##########\n",
            "\"old.html\" >>> new.html (latest): added product list:\n",
            "\n",
            "Producer ID: P1, \n",
            "Added Product ID: B, \n",
            "Previous: A, \n",
            "Next: C\n",
            "\n",
            "Producer ID: P3, \n",
            "Added Product ID: Z, \n",
            "Previous: None, \n",
            "Next: None\n",
            "\n",
            "##########\n",
            "\"new.html\" (latest): deleted product list:\n",
            "\n",
            "Producer ID: P1, \n",
            "Deleted Product ID: D, \n",
            "Previous: C, \n",
            "Next: None\n",
        );

        assert_eq!(render_to_string(&newer, &older), expected);
    }

    #[test]
    fn empty_sections_print_none_marker() {
        let snapshot: CatalogSnapshot = [("P1", vec!["A"])].into_iter().collect();

        let report = render_to_string(&snapshot, &snapshot);

        assert!(report.contains("added product list:\nNone\n"));
        assert!(report.ends_with("deleted product list:\nNone\n"));
    }

    #[test]
    fn fields_keep_a_space_before_each_line_break() {
        let newer: CatalogSnapshot = [("P1", vec!["A", "B"])].into_iter().collect();
        let older: CatalogSnapshot = [("P1", vec!["A"])].into_iter().collect();

        let report = render_to_string(&newer, &older);

        assert!(report.contains("Producer ID: P1, \nProduct Count: 2, "));
        assert!(report.contains("Producer ID: P1, \nAdded Product ID: B, \nPrevious: A, \nNext: None\n"));
        assert!(!report.contains(",\n"));
    }

    #[test]
    fn empty_group_lists_no_items() {
        assert_eq!(format_items(&[]), "[]");
    }
}
