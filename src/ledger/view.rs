//! HTML rendering for the ledger pages.

use std::collections::HashSet;

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, PILL_ACTIVE_STYLE,
        PILL_INACTIVE_STYLE, TAB_ACTIVE_STYLE, TAB_INACTIVE_STYLE, base, format_currency,
        magnitude_with_sign_color,
    },
    navigation::NavBar,
};

use super::{
    feed::{FeedPage, feed_page},
    ledger_page::{LedgerQuery, LedgerViewOptions, Tab},
    model::Transaction,
    pivot::{PivotNode, ViewMode},
    snapshot::LedgerSnapshot,
};

/// The max number of graphemes to display in tree rows and feed cards before
/// truncating and displaying ellipses.
const MAX_LABEL_GRAPHEMES: usize = 32;

/// Background colors for the level-2 rows of the pivot tree, keyed by the
/// category code embedded in the node id.
const CATEGORY_COLORS: [(&str, &str); 10] = [
    ("POOJA", "#E8F5E9"),
    ("VIGRAHAM", "#FFF3E0"),
    ("ALAYA_UPKARA", "#F3E5F5"),
    ("POSHAKA_SEVA", "#E3F2FD"),
    ("BHOODANA", "#FCE4EC"),
    ("SEVA_AND_NAIVEDYA", "#E0F2F1"),
    ("EVENTS", "#FFF9C4"),
    ("PRIEST_SERVICES", "#F1F8E9"),
    ("GENERAL_DONATIONS", "#EEEEEE"),
    ("SPECIAL_PROGRAMS", "#E8EAF6"),
];

const DEFAULT_ROW_COLOR: &str = "#FAFAFA";

/// Pixels of indentation added per tree depth level.
const INDENT_PX: usize = 24;

pub(crate) fn category_color(node_id: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(key, _)| node_id.contains(key))
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_ROW_COLOR)
}

/// The expanded-node ids to use on first render: every level-1 node open,
/// deeper levels collapsed.
pub(crate) fn initial_expanded(forest: &[&PivotNode]) -> HashSet<String> {
    let mut expanded = HashSet::new();
    for node in forest {
        toggle_expanded(&mut expanded, &node.id);
    }
    expanded
}

/// Pure toggle on the expanded-node set: add the id if absent, remove it if
/// present. Collapsing a node leaves its descendants' entries untouched.
pub(crate) fn toggle_expanded(expanded: &mut HashSet<String>, id: &str) {
    if !expanded.remove(id) {
        expanded.insert(id.to_owned());
    }
}

/// The level-1 nodes to render for a view: in by-devotee mode a non-empty
/// filter keeps only devotees whose name contains it, case-insensitively.
pub(crate) fn filter_level_one<'a>(
    forest: &'a [PivotNode],
    view_mode: ViewMode,
    filter: Option<&str>,
) -> Vec<&'a PivotNode> {
    match filter {
        Some(filter) if view_mode == ViewMode::ByDevotee && !filter.is_empty() => {
            let needle = filter.to_lowercase();
            forest
                .iter()
                .filter(|node| node.label.to_lowercase().contains(&needle))
                .collect()
        }
        _ => forest.iter().collect(),
    }
}

fn truncate_label(label: &str) -> String {
    let mut graphemes = label.graphemes(true);
    let truncated: String = graphemes.by_ref().take(MAX_LABEL_GRAPHEMES).collect();

    if graphemes.next().is_some() {
        format!("{truncated}…")
    } else {
        truncated
    }
}

fn drawer_url(view_mode: ViewMode, node_id: &str) -> String {
    let query =
        serde_urlencoded::to_string([("view", view_mode.as_query_value()), ("id", node_id)])
            .unwrap_or_default();
    format!("{}?{query}", endpoints::LEDGER_NODE)
}

fn transaction_drawer_url(transaction_id: &str) -> String {
    let query = serde_urlencoded::to_string([("txn", transaction_id)]).unwrap_or_default();
    format!("{}?{query}", endpoints::LEDGER_NODE)
}

/// Render the full ledger page.
pub(crate) fn ledger_view(
    snapshot: &LedgerSnapshot,
    options: &LedgerViewOptions,
    page_size: usize,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::LEDGER_VIEW).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (status_bar(snapshot.last_updated.as_deref()))
            (tab_nav(options.tab, options.view_mode))

            @match options.tab {
                Tab::Recent => {
                    (recent_feed_view(&snapshot.transactions, page_size))
                }
                Tab::Detailed => {
                    (detailed_view(snapshot, options))
                }
            }
        }
    };

    base("Transactions", &content)
}

fn status_bar(last_updated: Option<&str>) -> Markup {
    html! {
        div class="flex justify-between items-center px-3 py-1.5 bg-gray-200
            dark:bg-gray-800 border-b border-gray-300 dark:border-gray-700 rounded-t"
        {
            span class="text-xs text-gray-600 dark:text-gray-300 font-medium" data-last-sync="true"
            {
                @match last_updated {
                    Some(at) => { "Last Sync: " (at) }
                    None => { "Syncing…" }
                }
            }

            a href=(endpoints::LEDGER_EXPORT) class=(BUTTON_PRIMARY_STYLE) { "Download CSV" }
        }
    }
}

fn tab_nav(active: Tab, view_mode: ViewMode) -> Markup {
    let tab_link = |tab: Tab, title: &str| {
        let class = if tab == active {
            TAB_ACTIVE_STYLE
        } else {
            TAB_INACTIVE_STYLE
        };
        let url = LedgerQuery::new(tab, view_mode).to_url(endpoints::LEDGER_VIEW);

        html! {
            a
                href=(url)
                class=(class)
                aria-current=[(tab == active).then_some("page")]
            {
                (title)
            }
        }
    };

    html! {
        div class="flex bg-white dark:bg-gray-900 border-b border-gray-200 dark:border-gray-700"
        {
            (tab_link(Tab::Recent, "Recent"))
            (tab_link(Tab::Detailed, "Detailed"))
        }
    }
}

fn recent_feed_view(transactions: &[Transaction], page_size: usize) -> Markup {
    let page = feed_page(transactions, 1, page_size);

    html! {
        div id="recent-feed" class="overflow-y-auto p-4 bg-gray-100 dark:bg-gray-900 rounded-b"
        {
            (feed_page_fragment(&page, 2))
        }
    }
}

/// One page of feed cards plus, while more pages remain, the sentinel that
/// loads the next page when it scrolls into view.
pub(crate) fn feed_page_fragment(page: &FeedPage<'_>, next_page: usize) -> Markup {
    html! {
        @for transaction in page.items {
            (feed_card(transaction))
        }

        @if page.has_more {
            div
                data-feed-sentinel="true"
                class="py-4 text-center text-sm text-gray-400"
                hx-get=(format!("{}?page={next_page}", endpoints::LEDGER_RECENT))
                hx-trigger="revealed"
                hx-swap="outerHTML"
            {
                "Loading more…"
            }
        }
    }
}

fn feed_card(transaction: &Transaction) -> Markup {
    html! {
        div
            data-feed-card="true"
            role="button"
            class="p-3 mb-2 bg-white dark:bg-gray-800 rounded-md border-l-4
                border-blue-700 shadow-sm cursor-pointer"
            hx-get=(transaction_drawer_url(&transaction.transaction_id))
            hx-target="#drawer-root"
            hx-swap="innerHTML"
        {
            div class="flex justify-between mb-1"
            {
                span class="font-semibold truncate" { (truncate_label(&transaction.devotee_name)) }
                (magnitude_with_sign_color(transaction.signed_amount()))
            }

            div class="text-sm text-gray-500" { (transaction.devotee_email) }

            div class="flex justify-between text-xs text-gray-400 mt-1"
            {
                span { (transaction.booked_date) }
                span { (truncate_label(transaction.service_label())) }
            }
        }
    }
}

fn detailed_view(snapshot: &LedgerSnapshot, options: &LedgerViewOptions) -> Markup {
    let forest = snapshot.pivot(options.view_mode);
    let visible = filter_level_one(forest, options.view_mode, options.devotee_filter.as_deref());
    let expanded = initial_expanded(&visible);

    html! {
        section class="space-y-3 mt-3"
        {
            div class=(CARD_STYLE)
            {
                div class="grid grid-cols-2 gap-4"
                {
                    div
                    {
                        p class="text-xs text-gray-500" { "Total Amount" }
                        p
                            class="text-xl font-bold text-blue-700 dark:text-blue-400"
                            data-stat="total-amount"
                        {
                            (format_currency(snapshot.stats.total_amount))
                        }
                    }

                    div
                    {
                        p class="text-xs text-gray-500" { "Total Txns" }
                        p
                            class="text-xl font-bold text-blue-700 dark:text-blue-400"
                            data-stat="total-count"
                        {
                            (snapshot.stats.total_count)
                        }
                    }
                }

                div class="flex gap-2 mt-4 overflow-x-auto pb-1"
                {
                    @for mode in [ViewMode::ByYear, ViewMode::ByCategory, ViewMode::ByDevotee] {
                        (view_mode_pill(mode, options.view_mode))
                    }
                }

                @if options.view_mode == ViewMode::ByDevotee {
                    input
                        type="text"
                        name="q"
                        value=[options.devotee_filter.as_deref()]
                        placeholder="Search name..."
                        class="w-full p-2.5 mt-3 text-sm rounded-md border border-gray-300
                            dark:bg-gray-700 dark:border-gray-600"
                        hx-get=(format!("{}?view=byDevotee", endpoints::LEDGER_PIVOT))
                        hx-trigger="keyup changed delay:300ms"
                        hx-target="#pivot-tree"
                        hx-swap="outerHTML";
                }
            }

            div class=(CARD_STYLE)
            {
                (pivot_tree_view(&visible, &expanded, options.view_mode))
            }
        }
    }
}

fn view_mode_pill(mode: ViewMode, active: ViewMode) -> Markup {
    let class = if mode == active {
        PILL_ACTIVE_STYLE
    } else {
        PILL_INACTIVE_STYLE
    };
    let url = LedgerQuery::new(Tab::Detailed, mode).to_url(endpoints::LEDGER_VIEW);

    html! {
        a
            href=(url)
            class=(format!("whitespace-nowrap {class}"))
            data-view-pill=(mode.as_query_value())
            aria-current=[(mode == active).then_some("page")]
        {
            (mode.label())
        }
    }
}

/// Render a pivot forest as an indented, collapsible tree.
///
/// Nodes whose id is in `expanded` render open; disclosure after first paint
/// is native `<details>` state, which keeps collapsed descendants' state
/// intact. Rows with attached transactions are independently wired to open
/// the detail drawer.
pub(crate) fn pivot_tree_view(
    nodes: &[&PivotNode],
    expanded: &HashSet<String>,
    view_mode: ViewMode,
) -> Markup {
    html! {
        div id="pivot-tree" class="space-y-0.5"
        {
            @if nodes.is_empty() {
                p class="px-2 py-4 text-center text-sm text-gray-500" data-empty-state="true"
                {
                    "No transactions to display."
                }
            }

            @for node in nodes {
                (pivot_node_view(node, 0, expanded, view_mode))
            }
        }
    }
}

fn pivot_node_view(
    node: &PivotNode,
    depth: usize,
    expanded: &HashSet<String>,
    view_mode: ViewMode,
) -> Markup {
    let weight = match node.level {
        1 => "font-bold",
        2 => "font-semibold",
        _ => "font-medium",
    };
    let border = if node.level == 1 {
        "border-l-4 border-blue-700"
    } else {
        ""
    };
    let row_class = format!(
        "flex items-center gap-2 py-2 pr-2 mb-0.5 rounded cursor-pointer {weight} {border}"
    );
    let mut row_style = format!("padding-left:{}px", depth * INDENT_PX);
    if node.level == 2 {
        row_style.push_str(";background-color:");
        row_style.push_str(category_color(&node.id));
    }

    if node.has_children() {
        html! {
            details class="pivot-row" open[expanded.contains(&node.id)]
            {
                summary
                    class=(row_class)
                    style=(row_style)
                    data-level=(node.level)
                    data-node-id=(node.id)
                {
                    span class="w-4 shrink-0 font-semibold"
                    {
                        span class="marker-closed" { "▶" }
                        span class="marker-open" { "▼" }
                    }
                    span class="flex-1 truncate" { (truncate_label(&node.label)) }
                    span class="text-xs text-gray-500 shrink-0" { (node.count) }
                    (node_amount(node, view_mode))
                }

                div
                {
                    @for child in &node.children {
                        (pivot_node_view(child, depth + 1, expanded, view_mode))
                    }
                }
            }
        }
    } else {
        html! {
            div
                class=(row_class)
                style=(row_style)
                data-level=(node.level)
                data-node-id=(node.id)
                role=[node.has_transactions().then_some("button")]
                hx-get=[node.has_transactions().then(|| drawer_url(view_mode, &node.id))]
                hx-target=[node.has_transactions().then_some("#drawer-root")]
                hx-swap=[node.has_transactions().then_some("innerHTML")]
            {
                span class="w-4 shrink-0" {}
                span class="flex-1 truncate" { (truncate_label(&node.label)) }
                span class="text-xs text-gray-500 shrink-0" { (node.count) }
                span class="min-w-[100px] text-right shrink-0"
                {
                    (magnitude_with_sign_color(node.amount))
                }
            }
        }
    }
}

/// The amount cell for a branch row. When the branch also carries attached
/// transactions, the amount itself opens the drawer without toggling the
/// disclosure, so the two click targets stay independent.
fn node_amount(node: &PivotNode, view_mode: ViewMode) -> Markup {
    if node.has_transactions() {
        html! {
            span
                class="min-w-[100px] text-right shrink-0"
                role="button"
                hx-get=(drawer_url(view_mode, &node.id))
                hx-target="#drawer-root"
                hx-swap="innerHTML"
                onclick="event.preventDefault()"
            {
                (magnitude_with_sign_color(node.amount))
            }
        }
    } else {
        html! {
            span class="min-w-[100px] text-right shrink-0"
            {
                (magnitude_with_sign_color(node.amount))
            }
        }
    }
}

/// Render the detail drawer for a node with at least one attached
/// transaction. Both the backdrop and the close control clear the drawer
/// container, so nothing of the node survives dismissal.
pub(crate) fn drawer_view(node: &PivotNode) -> Markup {
    const CLOSE_DRAWER: &str = "document.getElementById('drawer-root').innerHTML=''";

    html! {
        div
            class="fixed inset-0 bg-black/50 z-40"
            data-drawer-backdrop="true"
            onclick=(CLOSE_DRAWER)
        {}

        div
            id="drawer-panel"
            class="fixed bottom-0 inset-x-0 max-h-[80vh] bg-white dark:bg-gray-800
                rounded-t-2xl z-50 flex flex-col"
        {
            header class="flex justify-between items-start p-4 border-b
                border-gray-200 dark:border-gray-700"
            {
                div
                {
                    h3 class="font-semibold" { (node.label) }
                    p class="text-sm text-gray-500" data-drawer-summary="true"
                    {
                        (node.count) " txn(s) • " (format_currency(node.amount))
                    }
                }

                button
                    type="button"
                    class="text-2xl leading-none text-gray-500 hover:text-gray-900
                        dark:hover:text-white"
                    aria-label="Close"
                    onclick=(CLOSE_DRAWER)
                {
                    "×"
                }
            }

            div class="overflow-y-auto p-4 space-y-2"
            {
                @for transaction in &node.transactions {
                    (drawer_transaction_row(transaction))
                }
            }
        }
    }
}

fn drawer_transaction_row(transaction: &Transaction) -> Markup {
    html! {
        div
            data-drawer-row="true"
            class="p-3 bg-gray-50 dark:bg-gray-700 rounded-md border-l-4 border-blue-700"
        {
            div class="flex justify-between"
            {
                span class="font-semibold truncate" { (truncate_label(&transaction.devotee_name)) }
                (magnitude_with_sign_color(transaction.signed_amount()))
            }

            div class="text-sm text-gray-500 dark:text-gray-300" { (transaction.devotee_email) }

            div class="text-xs text-gray-400 mt-1"
            {
                (transaction.booked_date) " • " (transaction.payment_type)
            }
        }
    }
}
