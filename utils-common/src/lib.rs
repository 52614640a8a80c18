pub mod compression;
pub mod models;

// 重新导出常用类型和函数，方便直接使用
pub use compression::{from_compressed, is_compressed, to_compressed, CompressionError, INDEX_VERSION};
pub use models::{PostDate, PostMetadata};
