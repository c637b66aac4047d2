//! The pivot rollups: pure functions that fold the flat transaction list
//! into three alternate three-level hierarchies.
//!
//! Each builder produces a forest of [PivotNode]s whose sums and counts obey
//! the same invariants: a leaf's amount/count come from its attached
//! transactions (reversal-adjusted), and every branch equals the sum of its
//! children. No transaction is ever dropped; records missing grouping fields
//! land under the documented fallback keys.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::model::Transaction;

/// One node of a pivot rollup.
///
/// Levels 1 and 2 carry `children`; level 3 carries the raw `transactions`
/// that were folded into it. The `id` encodes the full grouping path, which
/// makes it unique within its tree and lets the detail drawer find the node
/// again from a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotNode {
    /// Path-encoded identifier, unique within one tree.
    pub id: String,
    /// Human-readable text for the node.
    pub label: String,
    /// Reversal-adjusted sum over the node's subtree.
    pub amount: f64,
    /// Number of transactions in the node's subtree.
    pub count: usize,
    /// Depth of the node: 1 (root group), 2 (subgroup), or 3 (leaf group).
    pub level: u8,
    /// Child nodes; empty on leaves.
    pub children: Vec<PivotNode>,
    /// The records folded into a leaf; empty on branches.
    pub transactions: Vec<Transaction>,
}

impl PivotNode {
    pub(crate) fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub(crate) fn has_transactions(&self) -> bool {
        !self.transactions.is_empty()
    }
}

/// Which of the three rollups a view is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ViewMode {
    /// Year → category → service.
    #[default]
    #[serde(rename = "byYear")]
    ByYear,
    /// Category → service → year.
    #[serde(rename = "byCategory")]
    ByCategory,
    /// Devotee → year → category.
    #[serde(rename = "byDevotee")]
    ByDevotee,
}

impl ViewMode {
    pub(crate) fn as_query_value(self) -> &'static str {
        match self {
            ViewMode::ByYear => "byYear",
            ViewMode::ByCategory => "byCategory",
            ViewMode::ByDevotee => "byDevotee",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            ViewMode::ByYear => "By Year",
            ViewMode::ByCategory => "By Category",
            ViewMode::ByDevotee => "By Devotee",
        }
    }
}

type Grouped<'a> = BTreeMap<&'a str, BTreeMap<&'a str, BTreeMap<&'a str, Vec<&'a Transaction>>>>;

fn group_by<'a>(
    transactions: &'a [Transaction],
    key1: impl Fn(&'a Transaction) -> &'a str,
    key2: impl Fn(&'a Transaction) -> &'a str,
    key3: impl Fn(&'a Transaction) -> &'a str,
) -> Grouped<'a> {
    let mut groups: Grouped<'a> = BTreeMap::new();

    for transaction in transactions {
        groups
            .entry(key1(transaction))
            .or_default()
            .entry(key2(transaction))
            .or_default()
            .entry(key3(transaction))
            .or_default()
            .push(transaction);
    }

    groups
}

fn leaf_node(id: String, label: String, transactions: &[&Transaction]) -> PivotNode {
    PivotNode {
        id,
        label,
        amount: transactions.iter().map(|t| t.signed_amount()).sum(),
        count: transactions.len(),
        level: 3,
        children: Vec::new(),
        transactions: transactions.iter().map(|&t| t.clone()).collect(),
    }
}

fn branch_node(id: String, label: String, level: u8, children: Vec<PivotNode>) -> PivotNode {
    PivotNode {
        amount: children.iter().map(|child| child.amount).sum(),
        count: children.iter().map(|child| child.count).sum(),
        id,
        label,
        level,
        children,
        transactions: Vec::new(),
    }
}

/// The display label for a service-keyed node: the first folded transaction's
/// display name when present, otherwise the raw service id.
fn service_node_label(transactions: &[&Transaction], service_id: &str) -> String {
    transactions
        .first()
        .and_then(|t| t.service_display.as_deref())
        .filter(|display| !display.is_empty())
        .unwrap_or(service_id)
        .to_owned()
}

/// Formats a category code for display: underscores become spaces and each
/// word is title-cased, e.g. `GENERAL_DONATIONS` → "General Donations".
pub(crate) fn format_category_name(category: &str) -> String {
    category
        .replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the year → category → service rollup. Years are ordered most
/// recent first; categories and services are ordered ascending.
pub fn pivot_by_year(transactions: &[Transaction]) -> Vec<PivotNode> {
    let groups = group_by(
        transactions,
        Transaction::year_key,
        Transaction::category_key,
        Transaction::service_key,
    );

    groups
        .iter()
        .rev()
        .map(|(year, categories)| {
            let children = categories
                .iter()
                .map(|(category, services)| {
                    let children = services
                        .iter()
                        .map(|(service_id, txns)| {
                            leaf_node(
                                format!("{year}-{category}-{service_id}"),
                                service_node_label(txns, service_id),
                                txns,
                            )
                        })
                        .collect();
                    branch_node(
                        format!("{year}-{category}"),
                        format_category_name(category),
                        2,
                        children,
                    )
                })
                .collect();
            branch_node((*year).to_owned(), (*year).to_owned(), 1, children)
        })
        .collect()
}

/// Builds the category → service → year rollup. Categories and services are
/// ordered ascending; years within a service most recent first.
pub fn pivot_by_category(transactions: &[Transaction]) -> Vec<PivotNode> {
    let groups = group_by(
        transactions,
        Transaction::category_key,
        Transaction::service_key,
        Transaction::year_key,
    );

    groups
        .iter()
        .map(|(category, services)| {
            let children: Vec<PivotNode> = services
                .iter()
                .map(|(service_id, years)| {
                    let children: Vec<PivotNode> = years
                        .iter()
                        .rev()
                        .map(|(year, txns)| {
                            leaf_node(
                                format!("cat-{category}-{service_id}-{year}"),
                                (*year).to_owned(),
                                txns,
                            )
                        })
                        .collect();
                    // The service label comes from the most recent year's
                    // first transaction, matching the by-year rollup.
                    let label = children
                        .first()
                        .map(|child| service_node_label(&child.transactions.iter().collect::<Vec<_>>(), service_id))
                        .unwrap_or_else(|| (*service_id).to_owned());
                    branch_node(format!("cat-{category}-{service_id}"), label, 2, children)
                })
                .collect();
            branch_node(
                format!("cat-{category}"),
                format_category_name(category),
                1,
                children,
            )
        })
        .collect()
}

/// Builds the devotee → year → category rollup. Devotees are ordered
/// alphabetically; years within a devotee most recent first; categories
/// ascending.
pub fn pivot_by_devotee(transactions: &[Transaction]) -> Vec<PivotNode> {
    let groups = group_by(
        transactions,
        Transaction::devotee_key,
        Transaction::year_key,
        Transaction::category_key,
    );

    groups
        .iter()
        .map(|(devotee, years)| {
            let children = years
                .iter()
                .rev()
                .map(|(year, categories)| {
                    let children = categories
                        .iter()
                        .map(|(category, txns)| {
                            leaf_node(
                                format!("dev-{devotee}-{year}-{category}"),
                                format_category_name(category),
                                txns,
                            )
                        })
                        .collect();
                    branch_node(
                        format!("dev-{devotee}-{year}"),
                        (*year).to_owned(),
                        2,
                        children,
                    )
                })
                .collect();
            branch_node(
                format!("dev-{devotee}"),
                (*devotee).to_owned(),
                1,
                children,
            )
        })
        .collect()
}

/// Finds a node by id anywhere in a forest.
///
/// Ids encode the full grouping path, so at most one node matches within a
/// tree.
pub(crate) fn find_node<'a>(forest: &'a [PivotNode], id: &str) -> Option<&'a PivotNode> {
    for node in forest {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }

    None
}
