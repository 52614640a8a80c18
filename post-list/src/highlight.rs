use std::borrow::Cow;

use regex::RegexBuilder;

/// 高亮标记
const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// 用 `<mark>` 包裹文本中所有（不区分大小写的）搜索词
///
/// 搜索词中的正则元字符会被转义；搜索词或文本为空时原样返回。
pub fn highlight(text: &str, term: &str) -> String {
    mark_matches(text, term, |part| Cow::Borrowed(part))
}

/// 同 [`highlight`]，但会对匹配和未匹配的部分分别做 HTML 转义
pub fn highlight_html(text: &str, term: &str) -> String {
    mark_matches(text, term, escape_html)
}

/// HTML 转义，文本和属性值都可以用
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn mark_matches<'a, F>(text: &'a str, term: &str, transform: F) -> String
where
    F: Fn(&'a str) -> Cow<'a, str>,
{
    if text.is_empty() || term.is_empty() {
        return transform(text).into_owned();
    }

    let pattern = match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(_) => return transform(text).into_owned(),
    };

    let mut output = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for found in pattern.find_iter(text) {
        output.push_str(&transform(&text[last..found.start()]));
        output.push_str(MARK_OPEN);
        output.push_str(&transform(found.as_str()));
        output.push_str(MARK_CLOSE);
        last = found.end();
    }
    output.push_str(&transform(&text[last..]));
    output
}
