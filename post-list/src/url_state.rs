use std::borrow::Cow;

use urlencoding::{decode, encode};

use crate::models::FilterState;

/// 搜索词参数名
pub const SEARCH_PARAM: &str = "q";
/// 标签参数名，值为逗号分隔的标签列表
pub const TAGS_PARAM: &str = "tags";

/// 把筛选状态写成查询字符串（不带 `?`），空字段省略
///
/// 每个标签单独编码后再用逗号连接，所以标签内部的逗号会被编码，不会被拆开。
pub fn to_query(state: &FilterState) -> String {
    let mut params = Vec::new();

    if !state.search_term().is_empty() {
        params.push(format!("{}={}", SEARCH_PARAM, encode(state.search_term())));
    }

    if !state.active_tags().is_empty() {
        let tags = state
            .active_tags()
            .iter()
            .map(|tag| encode(tag))
            .collect::<Vec<_>>()
            .join(",");
        params.push(format!("{}={}", TAGS_PARAM, tags));
    }

    params.join("&")
}

/// 从查询字符串恢复筛选状态；可带前导 `?`，未知参数忽略
pub fn from_query(query: &str) -> FilterState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut state = FilterState::default();

    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            SEARCH_PARAM => state.set_search_term(&decode_component(value)),
            TAGS_PARAM => {
                for tag in value.split(',') {
                    state.add_tag(&decode_component(tag));
                }
            }
            _ => {}
        }
    }

    state
}

/// 生成写回地址栏的 URL；查询为空时去掉 `?`
pub fn page_url(path: &str, query: &str, hash: &str) -> String {
    if query.is_empty() {
        format!("{}{}", path, hash)
    } else {
        format!("{}?{}{}", path, query, hash)
    }
}

/// 表单编码里 `+` 表示空格；非法编码时保留原文
fn decode_component(value: &str) -> String {
    let value = value.replace('+', " ");
    match decode(&value) {
        Ok(Cow::Borrowed(decoded)) => decoded.to_string(),
        Ok(Cow::Owned(decoded)) => decoded,
        Err(_) => value,
    }
}
