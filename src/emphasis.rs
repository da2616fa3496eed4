use std::sync::LazyLock;

use regex::Regex;

use crate::block::Span;

const DELIMITER: &str = "**";

// Shortest `**...**` run that stays on one line.
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*[^\n\r\x{2028}\x{2029}]*?\*\*").expect("emphasis pattern is valid")
});

/// Split text on paired `**` delimiters.
///
/// Matched runs become [`Span::Emphasized`] with the delimiters removed; the
/// text around them becomes [`Span::Plain`], including empty fragments at
/// either end or between adjacent runs. Unpaired delimiters stay plain.
pub fn split_emphasis(text: &str) -> Vec<Span> {
    let mut fragments = Vec::new();
    let mut last = 0;

    for m in EMPHASIS.find_iter(text) {
        fragments.push(&text[last..m.start()]);
        fragments.push(m.as_str());
        last = m.end();
    }
    fragments.push(&text[last..]);

    fragments.into_iter().map(classify).collect()
}

fn classify(fragment: &str) -> Span {
    let paired = fragment.len() >= 2 * DELIMITER.len()
        && fragment.starts_with(DELIMITER)
        && fragment.ends_with(DELIMITER);

    if paired {
        let inner = &fragment[DELIMITER.len()..fragment.len() - DELIMITER.len()];
        Span::Emphasized(inner.to_string())
    } else {
        Span::Plain(fragment.to_string())
    }
}

/// Split text and drop the empty plain fragments, as block builders want.
pub(crate) fn inline_spans(text: &str) -> Vec<Span> {
    split_emphasis(text)
        .into_iter()
        .filter(|span| !matches!(span, Span::Plain(t) if t.is_empty()))
        .collect()
}
