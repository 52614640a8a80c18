use wasm_bindgen::prelude::*;

// 导出模块
pub mod config;
pub mod controller;
pub mod date_format;
pub mod filter;
pub mod highlight;
pub mod loader;
pub mod models;
pub mod paginator;
pub mod render;
pub mod tag_cloud;
pub mod url_state;

#[cfg(target_arch = "wasm32")]
mod dom;

pub use controller::{PageState, PostListController};
pub use loader::{decode_index, LoadError};
pub use models::{EmptyState, FilterState, ListUpdate, PaginationCursor, RenderMode};
pub use utils_common::{PostDate, PostMetadata};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
