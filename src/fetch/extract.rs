// src/fetch/extract.rs

use scraper::{Html, Selector};

use crate::errors::{PagewatchError, Result};

/// Collect the text of every element matched by `selector`.
///
/// Inner whitespace is collapsed and blank labels are skipped. A selector
/// that matches nothing is an error: an empty label set would otherwise be
/// read as "every label was removed".
pub fn extract_labels(html: &str, selector: &str) -> Result<Vec<String>> {
    let parsed = Selector::parse(selector)
        .map_err(|e| PagewatchError::Fetch(format!("invalid selector '{selector}': {e}")))?;

    let document = Html::parse_document(html);
    let labels: Vec<String> = document
        .select(&parsed)
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
        .collect();

    if labels.is_empty() {
        return Err(PagewatchError::Fetch(format!(
            "selector '{selector}' matched no labels"
        )));
    }
    Ok(labels)
}
