/// Joins text nodes into one line
///
/// Each node is trimmed, empty nodes are dropped and the rest are joined by a
/// single space. Whitespace inside a node is left alone.
pub fn join_text_nodes<'a, I>(nodes: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    nodes
        .into_iter()
        .map(str::trim)
        .filter(|node| !node.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cleans the raw date row text
///
/// Concatenates the nodes as-is, drops newlines and every occurrence of
/// `prefix`, then trims the result.
pub fn clean_date<'a, I>(nodes: I, prefix: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut raw: String = nodes.into_iter().collect();
    raw.retain(|c| c != '\n');

    let stripped = if prefix.is_empty() {
        raw
    } else {
        raw.replace(prefix, "")
    };

    stripped.trim().to_string()
}

