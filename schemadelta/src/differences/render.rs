//! Deterministic text report for a [`Differences`] tree.
//!
//! Only differing entries are written and empty sections are omitted. Each
//! nesting level is indented by two spaces.

use indexmap::IndexMap;

use super::{
    AttributeDifference, Category, DetailedDifference, Diff, Differences, ObjectDifference, PermissionDifference,
    TableDifference, ValueDifference, count_different,
};

const INDENT: &str = "  ";
const NONE: &str = "(none)";

/// Render the full report.
pub fn render_report(differences: &Differences) -> String {
    if !differences.has_differences() {
        return format!(
            "No differences found between {} and {}.\n",
            differences.database1, differences.database2
        );
    }

    let mut report = Report::default();
    report.line(0, format!("Database 1: {}", differences.database1));
    report.line(0, format!("Database 2: {}", differences.database2));

    for category in Category::ALL {
        let (heading, label) = (category.heading(), category.label());
        match category {
            Category::Properties => report.section(0, heading, label, &differences.properties),
            Category::Permissions => report.section(0, heading, label, &differences.permissions),
            Category::Tables => report.section(0, heading, label, &differences.tables),
            Category::UserTypes => report.section(0, heading, label, &differences.user_types),
            Category::Views => report.section(0, heading, label, &differences.views),
            Category::Functions => report.section(0, heading, label, &differences.functions),
            Category::Procedures => report.section(0, heading, label, &differences.procedures),
            Category::Synonyms => report.section(0, heading, label, &differences.synonyms),
        }
    }

    report.text
}

#[derive(Default)]
struct Report {
    text: String,
}

impl Report {
    fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        for _ in 0..depth {
            self.text.push_str(INDENT);
        }
        self.text.push_str(text.as_ref());
        self.text.push('\n');
    }

    /// Heading plus one entry per differing node.
    fn section<D: Entry>(&mut self, depth: usize, heading: &str, label: &str, nodes: &IndexMap<String, D>) {
        if count_different(nodes) == 0 {
            return;
        }
        self.line(depth, format!("{heading}:"));
        for (key, node) in nodes.iter().filter(|(_, node)| node.is_different()) {
            match node.existence().missing_from() {
                Some(side) => self.line(depth + 1, format!("{label}: {key} does not exist in {side}")),
                None => node.write(self, depth + 1, label, key),
            }
        }
    }

    fn properties(&mut self, depth: usize, properties: &IndexMap<String, ValueDifference>) {
        self.section(depth, "Extended properties", "Property", properties);
    }

    fn permissions(&mut self, depth: usize, permissions: &IndexMap<String, PermissionDifference>) {
        self.section(depth, "Permissions", "Permission", permissions);
    }
}

/// A node that exists on both sides and differs in its contents.
trait Entry: Diff {
    fn write(&self, report: &mut Report, depth: usize, label: &str, key: &str) {
        report.line(depth, format!("{label}: {key}"));
        self.write_details(report, depth + 1);
    }

    fn write_details(&self, _report: &mut Report, _depth: usize) {}
}

impl Entry for PermissionDifference {}

impl Entry for ValueDifference {
    fn write(&self, report: &mut Report, depth: usize, label: &str, key: &str) {
        report.line(
            depth,
            format!(
                "{label}: {key} value is different: database 1 value: {}, database 2 value: {}",
                self.value1.as_deref().unwrap_or(NONE),
                self.value2.as_deref().unwrap_or(NONE)
            ),
        );
    }
}

impl Entry for AttributeDifference {
    fn write_details(&self, report: &mut Report, depth: usize) {
        for discrepancy in &self.discrepancies {
            report.line(depth, discrepancy);
        }
    }
}

impl Entry for DetailedDifference {
    fn write_details(&self, report: &mut Report, depth: usize) {
        self.attributes.write_details(report, depth);
        report.properties(depth, &self.properties);
    }
}

impl Entry for ObjectDifference {
    fn write_details(&self, report: &mut Report, depth: usize) {
        if self.definitions_are_different() {
            report.line(depth, "Definition is different");
        }
        report.properties(depth, &self.properties);
        report.permissions(depth, &self.permissions);
    }
}

impl Entry for TableDifference {
    fn write_details(&self, report: &mut Report, depth: usize) {
        report.section(depth, "Columns", "Column", &self.columns);
        report.section(depth, "Triggers", "Trigger", &self.triggers);
        report.section(depth, "Indexes", "Index", &self.indexes);
        report.section(depth, "Relations", "Relation", &self.relations);
        report.properties(depth, &self.properties);
        report.permissions(depth, &self.permissions);
    }
}
