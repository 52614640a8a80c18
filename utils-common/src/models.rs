use bincode::{Decode, Encode};
use serde::{Deserialize, Deserializer, Serialize};

/// 文章日期 - 单个日期或日期范围
///
/// JSON 中既可以是 `"2025-10-11"`，也可以是 `{"start": "...", "end": "..."}`。
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum PostDate {
    /// ISO 日期字符串
    Single(String),
    /// 日期范围（系列文章、活动记录等）
    Range { start: String, end: String },
}

impl PostDate {
    /// 范围的开始日期；单个日期返回自身
    pub fn start(&self) -> &str {
        match self {
            PostDate::Single(date) => date,
            PostDate::Range { start, .. } => start,
        }
    }
}

/// 文章元数据 - 索引文件中的一条记录，不包含正文
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Debug, PartialEq, Eq)]
pub struct PostMetadata {
    /// 文章唯一标识符
    pub id: String,
    /// 文章标题
    pub title: String,
    /// 发布日期
    pub date: PostDate,
    /// 文章摘要，缺失或为 null 时为空
    #[serde(default, deserialize_with = "null_as_default")]
    pub excerpt: String,
    /// 文章文件路径（相对站点根目录）
    pub file: String,
    /// 文章标签列表，缺失或为 null 时为空
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// 把 `null` 当作默认值处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_range_dates() {
        let json = r#"[
            {"id": "a", "title": "A", "date": "2025-10-11", "excerpt": "x", "file": "posts/a.html", "tags": ["rust"]},
            {"id": "b", "title": "B", "date": {"start": "2025-08-12", "end": "2025-08-29"}, "excerpt": "", "file": "posts/b.html"}
        ]"#;
        let posts: Vec<PostMetadata> = serde_json::from_str(json).unwrap();

        assert_eq!(posts[0].date, PostDate::Single("2025-10-11".to_string()));
        assert_eq!(
            posts[1].date,
            PostDate::Range {
                start: "2025-08-12".to_string(),
                end: "2025-08-29".to_string()
            }
        );
        assert_eq!(posts[1].date.start(), "2025-08-12");
    }

    #[test]
    fn test_missing_optional_fields_degrade_to_empty() {
        let json = r#"{"id": "a", "title": "A", "date": "2025-10-11", "file": "a.html", "excerpt": null, "tags": null}"#;
        let post: PostMetadata = serde_json::from_str(json).unwrap();
        assert!(post.excerpt.is_empty());
        assert!(post.tags.is_empty());

        let json = r#"{"id": "a", "title": "A", "date": "2025-10-11", "file": "a.html"}"#;
        let post: PostMetadata = serde_json::from_str(json).unwrap();
        assert!(post.excerpt.is_empty());
        assert!(post.tags.is_empty());
    }
}
