use utils_common::PostMetadata;

use crate::models::{EmptyState, FilterState};

/// 文章匹配器 - 预先把搜索词和标签转成小写，避免每篇文章重复计算
pub struct PostMatcher {
    term: String,
    tags: Vec<String>,
}

impl PostMatcher {
    pub fn new(state: &FilterState) -> Self {
        Self {
            term: state.search_term().to_lowercase(),
            tags: state.active_tags().iter().map(|tag| tag.to_lowercase()).collect(),
        }
    }

    /// 搜索条件与标签条件之间是 AND，标签之间是 OR
    pub fn matches(&self, post: &PostMetadata) -> bool {
        self.matches_search(post) && self.matches_tags(post)
    }

    fn matches_search(&self, post: &PostMetadata) -> bool {
        if self.term.is_empty() {
            return true;
        }

        post.title.to_lowercase().contains(&self.term)
            || post.excerpt.to_lowercase().contains(&self.term)
            || post.tags.iter().any(|tag| tag.to_lowercase().contains(&self.term))
    }

    fn matches_tags(&self, post: &PostMetadata) -> bool {
        if self.tags.is_empty() {
            return true;
        }

        post.tags
            .iter()
            .any(|tag| self.tags.contains(&tag.to_lowercase()))
    }
}

/// 按筛选条件过滤文章，保持原有顺序
pub fn apply_filters<'a>(all: &'a [PostMetadata], state: &FilterState) -> Vec<&'a PostMetadata> {
    let matcher = PostMatcher::new(state);
    all.iter().filter(|post| matcher.matches(post)).collect()
}

/// 同 [`apply_filters`]，但返回文章在原列表中的下标
pub fn filtered_indices(all: &[PostMetadata], state: &FilterState) -> Vec<usize> {
    let matcher = PostMatcher::new(state);
    all.iter()
        .enumerate()
        .filter(|(_, post)| matcher.matches(post))
        .map(|(i, _)| i)
        .collect()
}

/// 筛选结果为空时应显示哪种提示
pub fn empty_state(total_posts: usize) -> EmptyState {
    if total_posts == 0 {
        EmptyState::NoPosts
    } else {
        EmptyState::NoMatches
    }
}
