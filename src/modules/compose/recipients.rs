/// Splits a `,` or `;` separated address list. Pieces are trimmed, empty pieces are
/// dropped, order and duplicates are kept.
pub fn split_recipients(input: Option<&str>) -> Vec<String> {
    input
        .unwrap_or_default()
        .split([',', ';'])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}
