use std::collections::BTreeSet;

/// 筛选状态 - 当前页面会话中的搜索词和激活标签
///
/// 搜索词总是去掉首尾空白后保存；标签的增删按不区分大小写比较。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search_term: String,
    active_tags: BTreeSet<String>,
}

impl FilterState {
    pub fn new<I, S>(search_term: &str, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = Self::default();
        state.set_search_term(search_term);
        for tag in tags {
            state.add_tag(tag.as_ref());
        }
        state
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn active_tags(&self) -> &BTreeSet<String> {
        &self.active_tags
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.trim().to_string();
    }

    /// 添加标签；已存在（不区分大小写）或为空时忽略
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.is_tag_active(tag) {
            self.active_tags.insert(tag.to_string());
        }
    }

    /// 切换标签，返回切换后该标签是否处于激活状态
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.is_tag_active(tag) {
            let needle = tag.trim().to_lowercase();
            self.active_tags.retain(|active| active.to_lowercase() != needle);
            false
        } else {
            self.add_tag(tag);
            self.is_tag_active(tag)
        }
    }

    pub fn is_tag_active(&self, tag: &str) -> bool {
        let needle = tag.trim().to_lowercase();
        self.active_tags.iter().any(|active| active.to_lowercase() == needle)
    }

    /// 是否没有任何筛选条件
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.active_tags.is_empty()
    }

    pub fn clear(&mut self) {
        self.search_term.clear();
        self.active_tags.clear();
    }
}

/// 分页游标 - 当前筛选结果中已展示到的位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationCursor {
    pub index: usize,
}

impl PaginationCursor {
    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// 结果为空时的两种情况
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// 索引里一篇文章都没有
    NoPosts,
    /// 有文章，但没有符合筛选条件的
    NoMatches,
}

/// 列表更新方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// 清空容器后写入（筛选条件变化或首次渲染）
    Replace,
    /// 追加到已有卡片之后（加载更多）
    Append,
}

/// 一次列表更新 - DOM 层据此修改结果容器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUpdate {
    pub mode: RenderMode,
    /// 卡片或空状态的 HTML，不含“加载更多”按钮
    pub markup: String,
    /// 尚未展示的结果数量
    pub remaining: usize,
}

impl ListUpdate {
    pub fn has_more(&self) -> bool {
        self.remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_is_trimmed() {
        let mut state = FilterState::default();
        state.set_search_term("  rust  ");
        assert_eq!(state.search_term(), "rust");

        state.set_search_term("   ");
        assert!(state.is_empty());
    }

    #[test]
    fn test_toggle_tag_ignores_case() {
        let mut state = FilterState::new("", ["Rust"]);

        assert!(state.is_tag_active("rust"));
        assert!(!state.toggle_tag("RUST"));
        assert!(state.active_tags().is_empty());

        assert!(state.toggle_tag("git"));
        assert!(state.is_tag_active("Git"));
    }

    #[test]
    fn test_add_tag_skips_duplicates_and_blanks() {
        let state = FilterState::new("", ["git", "Git", " ", "cpp"]);
        assert_eq!(state.active_tags().len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut state = FilterState::new("hello", ["git"]);
        assert!(!state.is_empty());
        state.clear();
        assert!(state.is_empty());
    }
}
