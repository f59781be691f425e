use crate::parsers::text;
use crate::parsers::{PageExtract, Region};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Extracts every region matching `region` plus the page-level date
pub fn extract(
    html: &str,
    region: &Selector,
    date: &Selector,
    links: &Selector,
    date_prefix: &str,
) -> PageExtract {
    let doc = Html::parse_document(html);

    let regions = doc
        .select(region)
        .map(|element| extract_region(element, links))
        .collect::<Vec<_>>();

    ::log::debug!("HTML parser matched {} regions", regions.len());

    let date = extract_date(&doc, date, date_prefix);

    PageExtract { date, regions }
}

/// Text, markup and link targets of one matched element
fn extract_region(element: ElementRef<'_>, links: &Selector) -> Region {
    let text = text::join_text_nodes(element.text());
    let html = element.html();
    let links = element
        .select(links)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.to_string())
        .collect();

    Region { text, html, links }
}

/// Text nodes beneath (not directly inside) every date element, in document
/// order. A date element nested in another one is covered by the outer walk.
fn extract_date(doc: &Html, date: &Selector, prefix: &str) -> String {
    let rows: Vec<ElementRef<'_>> = doc.select(date).collect();
    let matched: HashSet<_> = rows.iter().map(|row| row.id()).collect();
    let mut nodes: Vec<&str> = Vec::new();

    for row in rows {
        if row.ancestors().any(|node| matched.contains(&node.id())) {
            continue;
        }

        let row_id = row.id();
        for node in row.descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            if node.parent().map(|p| p.id()) == Some(row_id) {
                continue;
            }
            nodes.push(text);
        }
    }

    text::clean_date(nodes, prefix)
}
