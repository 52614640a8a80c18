//! 纯 HTML 生成，不接触 DOM，便于在浏览器外测试

use utils_common::PostMetadata;

use crate::date_format::format_date;
use crate::highlight::{escape_html, highlight_html};
use crate::models::{EmptyState, FilterState};
use crate::tag_cloud::TagCount;

/// 卡片上的文件地址属性，点击卡片时据此跳转
pub const FILE_ATTR: &str = "data-file";
/// 标签属性，标签云和卡片上的标签都带这个属性
pub const TAG_ATTR: &str = "data-tag";
/// 行为属性
pub const ACTION_ATTR: &str = "data-action";
/// “加载更多”按钮的行为值
pub const LOAD_MORE_ACTION: &str = "load-more";
/// 新卡片入场动画开始前的类名
pub const ENTERING_CLASS: &str = "entering";

/// 单张文章卡片
pub fn render_card(post: &PostMetadata, highlight_term: &str) -> String {
    let tags = if post.tags.is_empty() {
        String::new()
    } else {
        let chips: String = post
            .tags
            .iter()
            .map(|tag| {
                format!(
                    r#"<button type="button" class="post-tag" {}="{}">{}</button>"#,
                    TAG_ATTR,
                    escape_html(tag),
                    highlight_html(tag, highlight_term)
                )
            })
            .collect();
        format!(r#"<div class="post-tags">{}</div>"#, chips)
    };

    let file = escape_html(&post.file);
    format!(
        concat!(
            r#"<article class="post-card {entering}" {file_attr}="{file}">"#,
            r#"<div class="post-date">{date}</div>"#,
            r#"<h2 class="post-title">{title}</h2>"#,
            r#"<p class="post-excerpt">{excerpt}</p>"#,
            "{tags}",
            r#"<a href="{file}" class="read-more">READ MORE →</a>"#,
            "</article>"
        ),
        entering = ENTERING_CLASS,
        file_attr = FILE_ATTR,
        file = file,
        date = escape_html(&format_date(&post.date)),
        title = highlight_html(&post.title, highlight_term),
        excerpt = highlight_html(&post.excerpt, highlight_term),
        tags = tags,
    )
}

/// 多张卡片，顺序与输入一致
pub fn render_cards<'a, I>(posts: I, highlight_term: &str) -> String
where
    I: IntoIterator<Item = &'a PostMetadata>,
{
    posts
        .into_iter()
        .map(|post| render_card(post, highlight_term))
        .collect()
}

/// “加载更多”按钮；没有剩余时为空
pub fn render_load_more(remaining: usize) -> String {
    if remaining == 0 {
        return String::new();
    }

    format!(
        r#"<button type="button" id="loadMoreBtn" class="load-more-btn" {}="{}">Load More ({} remaining)</button>"#,
        ACTION_ATTR, LOAD_MORE_ACTION, remaining
    )
}

/// 空结果提示
pub fn render_empty(state: EmptyState) -> String {
    match state {
        EmptyState::NoPosts => {
            r#"<div class="loading">No posts yet. Check back soon!</div>"#.to_string()
        }
        EmptyState::NoMatches => {
            r#"<div class="no-results">No posts match your filters.</div>"#.to_string()
        }
    }
}

/// 索引加载失败提示；错误细节只写入控制台
pub fn render_load_error() -> String {
    r#"<div class="error">Failed to load posts. Please try again later.</div>"#.to_string()
}

/// 标签云，激活的标签带 `active` 类
pub fn render_tag_cloud(cloud: &[TagCount], state: &FilterState) -> String {
    cloud
        .iter()
        .map(|entry| {
            let active = state.is_tag_active(&entry.tag);
            format!(
                r#"<button type="button" class="tag-cloud-item{}" {}="{}" aria-pressed="{}">{} <span class="tag-count">{}</span></button>"#,
                if active { " active" } else { "" },
                TAG_ATTR,
                escape_html(&entry.tag),
                active,
                escape_html(&entry.tag),
                entry.count
            )
        })
        .collect()
}

/// 当前筛选条件；没有条件时为空
pub fn render_active_filters(state: &FilterState) -> String {
    if state.is_empty() {
        return String::new();
    }

    let mut parts = Vec::new();
    if !state.search_term().is_empty() {
        parts.push(format!(
            r#"<span class="active-filter active-search">Search: “{}”</span>"#,
            escape_html(state.search_term())
        ));
    }
    for tag in state.active_tags() {
        parts.push(format!(
            r#"<button type="button" class="active-filter active-tag" {}="{}">{} ×</button>"#,
            TAG_ATTR,
            escape_html(tag),
            escape_html(tag)
        ));
    }

    parts.concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use utils_common::PostDate;

    fn sample_post() -> PostMetadata {
        PostMetadata {
            id: "git".to_string(),
            title: "Tame Your Git".to_string(),
            date: PostDate::Single("2025-10-07".to_string()),
            excerpt: "Cleaner history & painless merges".to_string(),
            file: "posts/TameYourGit.html".to_string(),
            tags: vec!["git".to_string(), "<guide>".to_string()],
        }
    }

    #[test]
    fn test_card_contains_date_link_and_tags() {
        let html = render_card(&sample_post(), "");

        assert!(html.contains(r#"data-file="posts/TameYourGit.html""#));
        assert!(html.contains("October 7, 2025"));
        assert!(html.contains(r#"<h2 class="post-title">Tame Your Git</h2>"#));
        assert!(html.contains("Cleaner history &amp; painless merges"));
        assert!(html.contains(r#"data-tag="git""#));
        assert!(html.contains(r#"data-tag="&lt;guide&gt;""#));
        assert!(html.contains(r#"<a href="posts/TameYourGit.html" class="read-more">"#));
        assert!(html.contains(ENTERING_CLASS));
    }

    #[test]
    fn test_card_highlights_term() {
        let html = render_card(&sample_post(), "git");
        assert!(html.contains("Tame Your <mark>Git</mark>"));
        assert!(html.contains(r#"data-tag="git"><mark>git</mark></button>"#));
    }

    #[test]
    fn test_card_without_tags_has_no_tag_row() {
        let mut post = sample_post();
        post.tags.clear();
        assert!(!render_card(&post, "").contains("post-tags"));
    }

    #[test]
    fn test_cards_keep_order() {
        let first = sample_post();
        let mut second = sample_post();
        second.title = "Welcome".to_string();

        let html = render_cards([&first, &second], "");
        let a = html.find("Tame Your Git").unwrap();
        let b = html.find("Welcome").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_load_more() {
        assert_eq!(render_load_more(0), "");
        assert!(render_load_more(3).contains("Load More (3 remaining)"));
        assert!(render_load_more(3).contains(r#"data-action="load-more""#));
    }

    #[test]
    fn test_empty_states_differ() {
        assert!(render_empty(EmptyState::NoPosts).contains("No posts yet"));
        assert!(render_empty(EmptyState::NoMatches).contains("No posts match"));
    }

    #[test]
    fn test_tag_cloud_marks_active_tags() {
        let cloud = vec![
            TagCount { tag: "git".to_string(), count: 3 },
            TagCount { tag: "cpp".to_string(), count: 1 },
        ];
        let state = FilterState::new("", ["GIT"]);
        let html = render_tag_cloud(&cloud, &state);

        assert!(html.contains(r#"class="tag-cloud-item active" data-tag="git" aria-pressed="true""#));
        assert!(html.contains(r#"class="tag-cloud-item" data-tag="cpp" aria-pressed="false""#));
    }

    #[test]
    fn test_active_filters() {
        assert_eq!(render_active_filters(&FilterState::default()), "");

        let html = render_active_filters(&FilterState::new("<script>", ["git"]));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"data-tag="git""#));
    }
}
