use thiserror::Error;
use utils_common::{from_compressed, is_compressed, CompressionError, PostMetadata};

/// UTF-8 BOM，部分编辑器保存 JSON 时会带上
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 索引加载失败
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("网络请求失败: {0}")]
    Network(String),
    #[error("服务器返回错误状态: {0}")]
    Status(u16),
    #[error("解析索引 JSON 失败: {0}")]
    Json(#[from] serde_json::Error),
    #[error("解析紧凑索引失败: {0}")]
    Compact(#[from] CompressionError),
}

/// 解析索引数据，文章顺序与数据中的顺序一致
///
/// 以紧凑索引魔数开头的数据按二进制索引解析，其余按 JSON 数组解析。
pub fn decode_index(data: &[u8]) -> Result<Vec<PostMetadata>, LoadError> {
    if is_compressed(data) {
        return Ok(from_compressed(data)?);
    }

    let json = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    Ok(serde_json::from_slice(json)?)
}
