use crate::ops::{Effect, StyleOp};

/// The three stacked landing rows: 20/60/20 viewport heights while the page
/// loads, eased to equal thirds once everything is in.
#[derive(Debug, Default)]
pub struct RowLayout;

const ROWS: [&str; 3] = ["first-row", "second-row", "third-row"];
const ROW_TRANSITION: &str = "height 2s ease";

impl RowLayout {
    /// Styles to apply as soon as the rows exist.
    pub fn initial() -> Vec<Effect> {
        let heights = ["calc(20vh)", "calc(60vh)", "calc(20vh)"];
        ROWS.iter()
            .zip(heights)
            .flat_map(|(row, height)| {
                [
                    Effect::style(StyleOp::Height {
                        target: row,
                        value: height,
                    }),
                    Effect::style(StyleOp::Transition {
                        target: row,
                        value: ROW_TRANSITION,
                    }),
                ]
            })
            .collect()
    }

    /// Styles to apply once the page has fully loaded.
    pub fn equalize() -> Vec<Effect> {
        ROWS.iter()
            .map(|row| {
                Effect::style(StyleOp::Height {
                    target: row,
                    value: "calc((100vh / 3) - 1px)",
                })
            })
            .collect()
    }
}

/// Destination for a section button, when the button is known.
pub fn section_destination(button: &str) -> Option<&'static str> {
    Some(match button {
        "investing" => "investing.html",
        "fafsa" => "fafsa.html",
        "college" => "college.html",
        "investment-research" => "investing-evaluation.html",
        "banking" => "banking.html",
        "taxes" => "taxes.html",
        "psa" => "psa.html",
        "budget" => "budget.html",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_rows_get_heights_and_transitions() {
        let effects = RowLayout::initial();
        assert_eq!(effects.len(), 6);
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Style(StyleOp::Height {
                target: "second-row",
                value: "calc(60vh)",
            })
        )));
    }

    #[test]
    fn equalized_rows_share_a_third_each() {
        let effects = RowLayout::equalize();
        assert_eq!(effects.len(), 3);
        assert!(effects.iter().all(|effect| matches!(
            effect,
            Effect::Style(StyleOp::Height {
                value: "calc((100vh / 3) - 1px)",
                ..
            })
        )));
    }

    #[test]
    fn section_buttons_map_to_documents() {
        assert_eq!(section_destination("investing"), Some("investing.html"));
        assert_eq!(
            section_destination("investment-research"),
            Some("investing-evaluation.html")
        );
        assert_eq!(section_destination("unknown"), None);
    }
}
