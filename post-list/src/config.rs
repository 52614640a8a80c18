use serde::Deserialize;

use crate::paginator::PAGE_SIZE;

/// 挂载参数 - 由页面脚本传入，缺省字段使用默认值
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MountOptions {
    /// 结果容器的元素 ID（必需的元素）
    pub container_id: String,
    /// 搜索输入框
    pub search_input_id: String,
    /// 搜索按钮
    pub search_button_id: String,
    /// 标签云容器
    pub tag_cloud_id: String,
    /// 当前筛选条件的展示区域
    pub active_filters_id: String,
    /// 清除筛选按钮
    pub clear_filters_id: String,
    /// 索引文件地址
    pub index_url: String,
    /// 每页文章数
    pub page_size: usize,
    /// 搜索输入防抖时间（毫秒）
    pub debounce_ms: i32,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            container_id: "postsContainer".to_string(),
            search_input_id: "searchInput".to_string(),
            search_button_id: "searchButton".to_string(),
            tag_cloud_id: "tagCloud".to_string(),
            active_filters_id: "activeFilters".to_string(),
            clear_filters_id: "clearFilters".to_string(),
            index_url: "posts/index.json".to_string(),
            page_size: PAGE_SIZE,
            debounce_ms: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let options: MountOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, MountOptions::default());
        assert_eq!(options.page_size, 12);
        assert_eq!(options.debounce_ms, 300);
    }

    #[test]
    fn test_camel_case_overrides() {
        let options: MountOptions =
            serde_json::from_str(r#"{"containerId": "list", "indexUrl": "/index.bin", "pageSize": 6}"#)
                .unwrap();
        assert_eq!(options.container_id, "list");
        assert_eq!(options.index_url, "/index.bin");
        assert_eq!(options.page_size, 6);
        assert_eq!(options.search_input_id, "searchInput");
    }
}
