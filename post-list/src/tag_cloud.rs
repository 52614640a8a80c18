use std::collections::HashMap;

use utils_common::PostMetadata;

/// 标签及其出现次数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// 统计所有文章的标签，按出现次数降序；次数相同时保持首次出现的顺序
///
/// 标签按不区分大小写归并，显示首次出现时的写法。
pub fn build_tag_cloud(posts: &[PostMetadata]) -> Vec<TagCount> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut cloud: Vec<TagCount> = Vec::new();

    for tag in posts.iter().flat_map(|post| post.tags.iter()) {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }

        let key = tag.to_lowercase();
        match positions.get(&key) {
            Some(&i) => cloud[i].count += 1,
            None => {
                positions.insert(key, cloud.len());
                cloud.push(TagCount {
                    tag: tag.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by 是稳定排序
    cloud.sort_by(|a, b| b.count.cmp(&a.count));
    cloud
}

#[cfg(test)]
mod tests {
    use super::*;
    use utils_common::PostDate;

    fn post(tags: &[&str]) -> PostMetadata {
        PostMetadata {
            id: "p".to_string(),
            title: "P".to_string(),
            date: PostDate::Single("2025-10-07".to_string()),
            excerpt: String::new(),
            file: "posts/p.html".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_sorted_by_count_then_first_seen() {
        let posts = vec![
            post(&["life", "git"]),
            post(&["cpp", "git"]),
            post(&["cpp", "privacy"]),
            post(&["git"]),
        ];

        let cloud = build_tag_cloud(&posts);
        let pairs: Vec<(&str, usize)> = cloud.iter().map(|t| (t.tag.as_str(), t.count)).collect();
        assert_eq!(
            pairs,
            vec![("git", 3), ("cpp", 2), ("life", 1), ("privacy", 1)]
        );
    }

    #[test]
    fn test_case_variants_share_one_entry() {
        let posts = vec![post(&["Guide"]), post(&["guide", "rust"]), post(&["GUIDE "])];

        let cloud = build_tag_cloud(&posts);
        assert_eq!(
            cloud,
            vec![
                TagCount { tag: "Guide".to_string(), count: 3 },
                TagCount { tag: "rust".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_blank_tags_and_tagless_posts() {
        let posts = vec![post(&[]), post(&[" ", ""])];
        assert!(build_tag_cloud(&posts).is_empty());
    }
}
