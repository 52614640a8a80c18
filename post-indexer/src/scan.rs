use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use thiserror::Error;
use utils_common::{CompressionError, PostDate, PostMetadata};
use walkdir::WalkDir;

/// 没有 description 时，从正文截取的摘要长度（字符数）
const EXCERPT_CHARS: usize = 200;

/// 提取正文时跳过的标签
const NON_CONTENT_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
    "button", "svg",
];

/// 不当作文章处理的文件
const SKIPPED_FILES: &[&str] = &["404.html"];

/// 索引生成错误
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("源目录不存在或不是有效目录: {0}")]
    SourceMissing(PathBuf),
    #[error("遍历目录时出错: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("读写文件 {path} 失败: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("序列化 JSON 索引失败: {0}")]
    Json(#[from] serde_json::Error),
    #[error("生成紧凑索引失败: {0}")]
    Compact(#[from] CompressionError),
}

/// 扫描结果
#[derive(Debug, Default)]
pub struct ScanReport {
    pub posts: Vec<PostMetadata>,
    /// 没有标题或读取失败而跳过的 HTML 文件数
    pub skipped: usize,
}

/// 递归扫描目录中的 HTML 文件，按文件名顺序提取文章元数据
pub fn scan_posts(source: &Path, prefix: &str, verbose: bool) -> Result<ScanReport, IndexError> {
    if !source.is_dir() {
        return Err(IndexError::SourceMissing(source.to_path_buf()));
    }

    let mut report = ScanReport::default();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();

        let is_html = entry.file_type().is_file()
            && path.extension().map_or(false, |ext| ext == "html");
        if !is_html {
            continue;
        }

        let skipped_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |name| SKIPPED_FILES.contains(&name));
        if skipped_name {
            report.skipped += 1;
            continue;
        }

        match extract_post(path, source, prefix) {
            Ok(Some(post)) => {
                if verbose {
                    println!("处理: {} -> {}", path.display(), post.title);
                }
                report.posts.push(post);
            }
            Ok(None) => {
                if verbose {
                    println!("跳过（没有标题）: {}", path.display());
                }
                report.skipped += 1;
            }
            Err(e) => {
                eprintln!("解析文件时出错 {}: {}", path.display(), e);
                report.skipped += 1;
            }
        }
    }

    Ok(report)
}

/// 从单个 HTML 文件提取文章元数据；没有标题时返回 `None`
pub fn extract_post(path: &Path, base: &Path, prefix: &str) -> Result<Option<PostMetadata>, IndexError> {
    let io_error = |source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    };

    let html = fs::read_to_string(path).map_err(io_error)?;
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(io_error)?;
    let document = &dom.document;

    let title = find_element(document, "title")
        .or_else(|| find_element(document, "h1"))
        .map(|element| collapse_whitespace(&text_content(&element)))
        .unwrap_or_default();
    if title.is_empty() {
        return Ok(None);
    }

    let mut metas = Vec::new();
    collect_meta(document, &mut metas);
    let meta = |key: &str| {
        metas
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, content)| content.trim())
            .filter(|content| !content.is_empty())
    };

    let date = meta("date")
        .and_then(parse_meta_date)
        .or_else(|| meta("article:published_time").and_then(parse_meta_date))
        .unwrap_or_else(|| PostDate::Single(Utc::now().date_naive().format("%Y-%m-%d").to_string()));

    let excerpt = match meta("description") {
        Some(description) => description.to_string(),
        None => body_excerpt(document),
    };

    let relative = path
        .strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");
    let id = relative.trim_end_matches(".html").to_string();
    let prefix = prefix.trim_matches('/');
    let file = if prefix.is_empty() {
        relative.clone()
    } else {
        format!("{}/{}", prefix, relative)
    };

    Ok(Some(PostMetadata {
        id,
        title,
        date,
        excerpt,
        file,
        tags: collect_tags(&metas),
    }))
}

/// 解析日期：`YYYY-MM-DD`、RFC 3339 时间，或 ISO 区间 `start/end`
fn parse_meta_date(value: &str) -> Option<PostDate> {
    match value.split_once('/') {
        Some((start, end)) => Some(PostDate::Range {
            start: normalize_date(start)?,
            end: normalize_date(end)?,
        }),
        None => normalize_date(value).map(PostDate::Single),
    }
}

fn normalize_date(value: &str) -> Option<String> {
    let value = value.trim();
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// `article:tag` 与 `keywords` 中的标签，按出现顺序去重（不区分大小写）
fn collect_tags(metas: &[(String, String)]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    let values = metas
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("article:tag") || name.eq_ignore_ascii_case("keywords"))
        .flat_map(|(_, content)| content.split(','));

    for tag in values.map(str::trim).filter(|tag| !tag.is_empty()) {
        if !tags.iter().any(|seen| seen.to_lowercase() == tag.to_lowercase()) {
            tags.push(tag.to_string());
        }
    }

    tags
}

/// 正文段落截取的摘要
fn body_excerpt(document: &Handle) -> String {
    let mut paragraphs = Vec::new();
    collect_paragraphs(document, &mut paragraphs);
    let text = paragraphs.join(" ");

    if text.chars().count() <= EXCERPT_CHARS {
        return text;
    }

    let mut excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
    excerpt.truncate(excerpt.trim_end().len());
    excerpt.push_str("...");
    excerpt
}

fn element_name(handle: &Handle) -> Option<&str> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 深度优先查找第一个指定名称的元素
fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if element_name(handle) == Some(tag) {
        return Some(handle.clone());
    }

    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

fn collect_meta(handle: &Handle, metas: &mut Vec<(String, String)>) {
    if let NodeData::Element { ref name, ref attrs, .. } = handle.data {
        if name.local.as_ref() == "meta" {
            let attrs = attrs.borrow();
            let attr = |key: &str| {
                attrs
                    .iter()
                    .find(|a| a.name.local.as_ref() == key)
                    .map(|a| a.value.to_string())
            };

            if let (Some(key), Some(content)) = (attr("name").or_else(|| attr("property")), attr("content")) {
                metas.push((key, content));
            }
        }
    }

    for child in handle.children.borrow().iter() {
        collect_meta(child, metas);
    }
}

fn collect_paragraphs(handle: &Handle, paragraphs: &mut Vec<String>) {
    match element_name(handle) {
        Some(name) if NON_CONTENT_TAGS.contains(&name) => return,
        Some("p") => {
            let text = collapse_whitespace(&text_content(handle));
            if !text.is_empty() {
                paragraphs.push(text);
            }
            return;
        }
        _ => {}
    }

    for child in handle.children.borrow().iter() {
        collect_paragraphs(child, paragraphs);
    }
}

fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    append_text(handle, &mut text);
    text
}

fn append_text(handle: &Handle, text: &mut String) {
    if let NodeData::Text { ref contents } = handle.data {
        text.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        append_text(child, text);
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, html: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, html).unwrap();
        path
    }

    #[test]
    fn test_extracts_metadata_from_meta_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "TameYourGit.html",
            r#"<!DOCTYPE html><html><head>
                <title>Tame Your Git: Cleaner History, Painless Merges</title>
                <meta name="description" content="Rebase, squash and merge without fear.">
                <meta name="date" content="2025-10-07">
                <meta property="article:tag" content="git">
                <meta property="article:tag" content="Workflow">
                <meta name="keywords" content="git, tools, workflow">
            </head><body><h1>Ignored</h1></body></html>"#,
        );

        let post = extract_post(&path, dir.path(), "posts").unwrap().unwrap();
        assert_eq!(post.id, "TameYourGit");
        assert_eq!(post.title, "Tame Your Git: Cleaner History, Painless Merges");
        assert_eq!(post.date, PostDate::Single("2025-10-07".to_string()));
        assert_eq!(post.excerpt, "Rebase, squash and merge without fear.");
        assert_eq!(post.file, "posts/TameYourGit.html");
        assert_eq!(post.tags, vec!["git", "Workflow", "tools"]);
    }

    #[test]
    fn test_falls_back_to_h1_published_time_and_body_text() {
        let dir = tempfile::tempdir().unwrap();
        let long_paragraph = "word ".repeat(100);
        let html = format!(
            r#"<html><head><meta property="article:published_time" content="2025-10-10T08:00:00Z"></head>
            <body><nav><p>Home About</p></nav><h1>Beginner-friendly C++ basics guide</h1>
            <p>First   paragraph.</p><p>{}</p></body></html>"#,
            long_paragraph
        );
        let path = write(dir.path(), "guides/cpp.html", &html);

        let post = extract_post(&path, dir.path(), "/posts/").unwrap().unwrap();
        assert_eq!(post.id, "guides/cpp");
        assert_eq!(post.file, "posts/guides/cpp.html");
        assert_eq!(post.title, "Beginner-friendly C++ basics guide");
        assert_eq!(post.date, PostDate::Single("2025-10-10".to_string()));
        assert!(post.excerpt.starts_with("First paragraph. word word"));
        assert!(post.excerpt.ends_with("..."));
        assert!(!post.excerpt.contains("Home"));
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_date_ranges() {
        assert_eq!(
            parse_meta_date("2025-08-12/2025-09-05"),
            Some(PostDate::Range {
                start: "2025-08-12".to_string(),
                end: "2025-09-05".to_string()
            })
        );
        assert_eq!(parse_meta_date("2025-08-12/soon"), None);
        assert_eq!(parse_meta_date("yesterday"), None);
    }

    #[test]
    fn test_scan_skips_untitled_and_non_html_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.html", "<html><head><title>A</title></head></html>");
        write(dir.path(), "b.html", "<html><body><p>no title here</p></body></html>");
        write(dir.path(), "404.html", "<html><head><title>Not found</title></head></html>");
        write(dir.path(), "notes.txt", "<title>Not a post</title>");

        let report = scan_posts(dir.path(), "posts", false).unwrap();
        assert_eq!(report.posts.len(), 1);
        assert_eq!(report.posts[0].title, "A");
        assert_eq!(report.skipped, 2);
    }
}
