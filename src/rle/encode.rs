//! RLE encoding.

use super::{Pattern, RleHeader};

/// Longest body line emitted by [`encode`].
pub const MAX_LINE_LEN: usize = 70;

/// Rule written when a pattern carries none.
pub const DEFAULT_RULE: &str = "B3/S23";

/// A single repeatable item in an RLE body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RleItem {
    Cell(bool),
    EndRow,
}

impl RleItem {
    fn repeated(self, count: usize) -> String {
        let mut ret = String::new();
        if count > 1 {
            ret.push_str(&count.to_string());
        }
        ret.push(match self {
            RleItem::Cell(true) => 'o',
            RleItem::Cell(false) => 'b',
            RleItem::EndRow => '$',
        });
        ret
    }
}

fn push_item(items: &mut Vec<(usize, RleItem)>, item: RleItem) {
    match items.last_mut() {
        Some((n, last)) if *last == item => *n += 1,
        _ => items.push((1, item)),
    }
}

/// Encode a pattern as RLE text.
///
/// Trailing dead cells of each row and trailing blank rows are omitted and
/// consecutive row ends are merged into a single `n$`.
pub fn encode(pattern: &Pattern) -> String {
    let mut items: Vec<(usize, RleItem)> = Vec::new();
    for row in 0..pattern.rows() {
        if row > 0 {
            push_item(&mut items, RleItem::EndRow);
        }
        for col in 0..pattern.cols() {
            push_item(&mut items, RleItem::Cell(pattern.get(row, col)));
        }
        if let Some((_, RleItem::Cell(false))) = items.last() {
            items.pop();
        }
    }
    while let Some((_, RleItem::EndRow)) = items.last() {
        items.pop();
    }

    let header = RleHeader {
        x: pattern.cols(),
        y: pattern.rows(),
        rule: Some(pattern.rule().unwrap_or(DEFAULT_RULE).to_string()),
    };

    let mut ret = header.to_string();
    ret.push('\n');
    let mut line_len = 0;
    let tokens = items
        .into_iter()
        .map(|(count, item)| item.repeated(count))
        .chain(std::iter::once("!".to_string()));
    for token in tokens {
        if line_len > 0 && line_len + token.len() > MAX_LINE_LEN {
            ret.push('\n');
            line_len = 0;
        }
        line_len += token.len();
        ret.push_str(&token);
    }
    ret.push('\n');
    ret
}
