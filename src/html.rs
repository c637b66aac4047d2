use maud::{DOCTYPE, Markup, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "px-4 py-2 bg-blue-600 \
    hover:bg-blue-700 text-white text-sm font-semibold rounded";

// Card styles
pub const CARD_STYLE: &str = "rounded-lg bg-white shadow-sm dark:bg-gray-800 p-4";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col px-4 py-4 mx-auto max-w-3xl text-gray-900 dark:text-white";

// Tab styles for the recent/detailed switcher
pub const TAB_ACTIVE_STYLE: &str = "flex-1 py-3 text-center font-semibold \
    text-blue-600 border-b-2 border-blue-600 dark:text-blue-400";
pub const TAB_INACTIVE_STYLE: &str = "flex-1 py-3 text-center font-semibold \
    text-gray-500 hover:text-blue-600 dark:text-gray-400";

// View-mode pill styles
pub const PILL_ACTIVE_STYLE: &str = "px-4 py-1.5 rounded-full text-sm \
    bg-blue-600 text-white";
pub const PILL_INACTIVE_STYLE: &str = "px-4 py-1.5 rounded-full text-sm \
    border border-gray-300 text-gray-600 hover:border-blue-400 \
    dark:border-gray-600 dark:text-gray-300";

// Amount color classes, keyed by sign
pub const AMOUNT_POSITIVE_STYLE: &str = "text-green-700 dark:text-green-300";
pub const AMOUNT_NEGATIVE_STYLE: &str = "text-red-700 dark:text-red-300";

pub fn amount_class(amount: f64) -> &'static str {
    if amount < 0.0 {
        AMOUNT_NEGATIVE_STYLE
    } else {
        AMOUNT_POSITIVE_STYLE
    }
}

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Seva Ledger" }

                script src="https://unpkg.com/htmx.org@2.0.8" integrity="sha384-/TgkGk7p307TH7EXJDuUlgG3Ce1UVolAOFopFekQkkXihi5u/6OCvVKyz1W+idaz" crossorigin="anonymous" {}
                script src="https://cdn.tailwindcss.com" {}

                style
                {
                    r#"
                    @keyframes slideUp {
                        from { transform: translateY(100%); }
                        to { transform: translateY(0); }
                    }

                    #drawer-panel {
                        animation: slideUp 0.3s ease-out;
                    }

                    /* Hide the native disclosure marker; the tree draws its own. */
                    .pivot-row > summary {
                        list-style: none;
                    }
                    .pivot-row > summary::-webkit-details-marker {
                        display: none;
                    }
                    .pivot-row > summary .marker-open { display: none; }
                    .pivot-row[open] > summary .marker-open { display: inline; }
                    .pivot-row[open] > summary .marker-closed { display: none; }
                    "#
                }
            }

            body class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // The detail drawer swaps into this container; closing it
                // clears the container so no stale node data survives.
                div id="drawer-root" {}
            }
        }
    }
}

pub fn error_view(description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to the Ledger"
                    }
                }
            }
        }
    );

    base(description, &content)
}

pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

/// Renders an amount as its absolute magnitude, with the sign conveyed only
/// through the color class. Used everywhere a pivot or feed row shows money.
pub fn magnitude_with_sign_color(amount: f64) -> Markup {
    html!(
        span class=(amount_class(amount)) { (format_currency(amount.abs())) }
    )
}

#[cfg(test)]
mod tests {
    use super::{amount_class, format_currency, magnitude_with_sign_color};

    #[test]
    fn format_currency_groups_and_pads_decimals() {
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(12.3), "$12.30");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-1234.56), "-$1,234.56");
    }

    #[test]
    fn magnitude_rendering_never_shows_a_leading_minus() {
        let markup = magnitude_with_sign_color(-1234.56).into_string();

        assert!(markup.contains("$1,234.56"), "got: {markup}");
        assert!(!markup.contains("-$"), "got: {markup}");
        assert!(markup.contains("text-red-700"), "got: {markup}");
    }

    #[test]
    fn amount_class_colors_by_sign() {
        assert!(amount_class(-1.0).contains("red"));
        assert!(amount_class(1.0).contains("green"));
        assert!(amount_class(0.0).contains("green"));
    }
}
