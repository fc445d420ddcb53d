//! Console rendering of results, counts and validation outcomes.
//!
//! Every function here is pure and deterministic so tutorial output can be
//! compared across runs.

use crate::query::ResultTable;
use ontolab_reason::ClosureStats;
use ontolab_shacl::ValidationReport;
use oxrdf::{Term, Variable};

/// How [`render_rows`] lays out each solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// `1. var: value, var: value`
    #[default]
    Compact,
    /// A numbered header followed by one `var: value` line per binding.
    Columns,
}

/// A title framed by `=` rules.
pub fn banner(title: &str, width: usize) -> String {
    let rule = "=".repeat(width);
    format!("{rule}\n{title}\n{rule}")
}

/// A title underlined with a `-` rule.
pub fn section(title: &str, width: usize) -> String {
    format!("{title}\n{}", "-".repeat(width))
}

/// A short human label for a term.
///
/// Literals render as their lexical value, IRIs as their local name (after
/// the last `#` or `/`) and blank nodes as `_:id`.
///
/// ```
/// use ontolab::report::term_label;
/// use oxrdf::{Literal, NamedNode, Term};
///
/// let iri = NamedNode::new("http://example.org/computers#DedicatedGPU")?;
/// assert_eq!(term_label(&Term::from(iri)), "DedicatedGPU");
/// assert_eq!(term_label(&Term::from(Literal::from(16))), "16");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn term_label(term: &Term) -> String {
    match term {
        Term::Literal(literal) => literal.value().to_owned(),
        Term::NamedNode(node) => local_name(node.as_str()).to_owned(),
        Term::BlankNode(_) => term.to_string(),
    }
}

/// The part of an IRI after its last `#` or `/`.
///
/// IRIs ending with a separator are returned whole.
pub fn local_name(iri: &str) -> &str {
    match iri.rfind(['#', '/']) {
        Some(position) if position + 1 < iri.len() => &iri[position + 1..],
        _ => iri,
    }
}

/// Numbered rows, skipping unbound variables.
pub fn render_rows(table: &ResultTable, layout: Layout) -> String {
    if table.is_empty() {
        return "  No results found.".into();
    }
    let mut lines = Vec::new();
    for (i, row) in table.rows.iter().enumerate() {
        let bindings = table
            .variables
            .iter()
            .filter_map(|variable| {
                row.get(variable.as_str())
                    .map(|term| format!("{}: {}", variable.as_str(), term_label(term)))
            })
            .collect::<Vec<_>>();
        match layout {
            Layout::Compact => lines.push(format!("  {}. {}", i + 1, bindings.join(", "))),
            Layout::Columns => {
                lines.push(format!("  {}.", i + 1));
                lines.extend(bindings.into_iter().map(|binding| format!("     {binding}")));
            }
        }
    }
    lines.join("\n")
}

/// A fixed-width table with one column per declared variable.
///
/// ```
/// use ontolab::report::render_table;
/// use ontolab::{ResultRow, ResultTable};
/// use oxrdf::{Literal, Variable};
///
/// let name = Variable::new("name")?;
/// let table = ResultTable {
///     variables: vec![name.clone()],
///     rows: vec![ResultRow::new([(name, Literal::from("Alice").into())])],
/// };
/// assert_eq!(render_table(&table), "name \n-----\nAlice");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn render_table(table: &ResultTable) -> String {
    let cells = table
        .rows
        .iter()
        .map(|row| {
            table
                .variables
                .iter()
                .map(|variable| row.get(variable.as_str()).map(term_label).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let widths = table
        .variables
        .iter()
        .enumerate()
        .map(|(i, variable)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain([variable.as_str().chars().count()])
                .max()
                .unwrap_or_default()
        })
        .collect::<Vec<_>>();

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(join_padded(
        table.variables.iter().map(Variable::as_str),
        &widths,
    ));
    lines.push("-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in &cells {
        lines.push(join_padded(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn join_padded<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Triple counts before and after a closure.
pub fn closure_summary(stats: &ClosureStats) -> String {
    format!(
        "Original triples: {}\nAfter reasoning: {} triples ({} inferred in {} rounds)",
        stats.input_triples, stats.output_triples, stats.inferred_triples, stats.iterations
    )
}

/// The conformance flag followed by the full report text.
pub fn conformance(report: &ValidationReport) -> String {
    format!(
        "Conforms: {}\n\nValidation Report:\n{report}",
        report.conforms()
    )
}
