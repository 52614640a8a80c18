use utils_common::PostMetadata;

use crate::filter::{empty_state, filtered_indices};
use crate::models::{FilterState, ListUpdate, PaginationCursor, RenderMode};
use crate::paginator::next_page;
use crate::render::{render_active_filters, render_cards, render_empty, render_tag_cloud};
use crate::tag_cloud::{build_tag_cloud, TagCount};
use crate::url_state::to_query;

/// 文章列表控制器 - 持有文章、筛选状态和分页游标
///
/// 筛选结果只由 (文章列表, 搜索词, 激活标签) 决定；任何筛选变化都会
/// 重新计算结果并把游标归零。所有方法只返回 HTML，不接触 DOM。
pub struct PostListController {
    posts: Vec<PostMetadata>,
    state: FilterState,
    /// 符合条件的文章在 `posts` 中的下标
    filtered: Vec<usize>,
    cursor: PaginationCursor,
    page_size: usize,
    tag_cloud: Vec<TagCount>,
}

impl PostListController {
    pub fn new(posts: Vec<PostMetadata>, state: FilterState, page_size: usize) -> Self {
        let tag_cloud = build_tag_cloud(&posts);
        let filtered = filtered_indices(&posts, &state);

        Self {
            posts,
            state,
            filtered,
            cursor: PaginationCursor::default(),
            page_size,
            tag_cloud,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn cursor(&self) -> PaginationCursor {
        self.cursor
    }

    pub fn tag_cloud(&self) -> &[TagCount] {
        &self.tag_cloud
    }

    /// 当前筛选结果
    pub fn filtered(&self) -> impl Iterator<Item = &PostMetadata> + '_ {
        self.filtered.iter().map(move |&i| &self.posts[i])
    }

    /// 从头渲染第一页
    pub fn first_page(&mut self) -> ListUpdate {
        self.cursor.reset();
        self.render_next(RenderMode::Replace)
    }

    /// 追加下一页
    pub fn load_more(&mut self) -> ListUpdate {
        self.render_next(RenderMode::Append)
    }

    /// 设置搜索词；规范化后与当前相同则返回 `None`
    pub fn set_search(&mut self, term: &str) -> Option<ListUpdate> {
        let mut state = self.state.clone();
        state.set_search_term(term);
        self.apply(state)
    }

    /// 切换标签筛选
    pub fn toggle_tag(&mut self, tag: &str) -> Option<ListUpdate> {
        let mut state = self.state.clone();
        state.toggle_tag(tag);
        self.apply(state)
    }

    /// 清除全部筛选条件
    pub fn clear_filters(&mut self) -> Option<ListUpdate> {
        self.apply(FilterState::default())
    }

    /// 应用新的筛选状态，重新计算结果并渲染第一页
    pub fn apply(&mut self, state: FilterState) -> Option<ListUpdate> {
        if state == self.state {
            return None;
        }

        self.filtered = filtered_indices(&self.posts, &state);
        self.state = state;
        Some(self.first_page())
    }

    /// 当前状态对应的查询字符串
    pub fn query(&self) -> String {
        to_query(&self.state)
    }

    pub fn tag_cloud_markup(&self) -> String {
        render_tag_cloud(&self.tag_cloud, &self.state)
    }

    pub fn active_filters_markup(&self) -> String {
        render_active_filters(&self.state)
    }

    fn render_next(&mut self, mode: RenderMode) -> ListUpdate {
        if self.filtered.is_empty() {
            let markup = match mode {
                RenderMode::Replace => render_empty(empty_state(self.posts.len())),
                RenderMode::Append => String::new(),
            };
            return ListUpdate {
                mode,
                markup,
                remaining: 0,
            };
        }

        let page = next_page(&self.filtered, self.cursor, self.page_size);
        let markup = render_cards(
            page.items.iter().map(|&i| &self.posts[i]),
            self.state.search_term(),
        );
        let (cursor, remaining) = (page.cursor, page.remaining);
        self.cursor = cursor;

        ListUpdate {
            mode,
            markup,
            remaining,
        }
    }
}

/// 页面状态 - 索引加载完成前只记录筛选条件，加载后交给控制器
pub enum PageState {
    Loading(FilterState),
    Ready(PostListController),
}

impl PageState {
    pub fn state(&self) -> &FilterState {
        match self {
            Self::Loading(state) => state,
            Self::Ready(controller) => controller.state(),
        }
    }

    pub fn controller(&self) -> Option<&PostListController> {
        match self {
            Self::Loading(_) => None,
            Self::Ready(controller) => Some(controller),
        }
    }

    /// 加载中只改写待用的筛选状态，返回 `None`
    pub fn set_search(&mut self, term: &str) -> Option<ListUpdate> {
        match self {
            Self::Loading(state) => {
                state.set_search_term(term);
                None
            }
            Self::Ready(controller) => controller.set_search(term),
        }
    }

    pub fn toggle_tag(&mut self, tag: &str) -> Option<ListUpdate> {
        match self {
            Self::Loading(state) => {
                state.toggle_tag(tag);
                None
            }
            Self::Ready(controller) => controller.toggle_tag(tag),
        }
    }

    pub fn clear_filters(&mut self) -> Option<ListUpdate> {
        match self {
            Self::Loading(state) => {
                state.clear();
                None
            }
            Self::Ready(controller) => controller.clear_filters(),
        }
    }

    pub fn load_more(&mut self) -> Option<ListUpdate> {
        match self {
            Self::Loading(_) => None,
            Self::Ready(controller) => Some(controller.load_more()),
        }
    }

    /// 索引到达：用当前筛选状态建立控制器并渲染第一页
    pub fn finish_loading(&mut self, posts: Vec<PostMetadata>, page_size: usize) -> ListUpdate {
        let mut controller = PostListController::new(posts, self.state().clone(), page_size);
        let update = controller.first_page();
        *self = Self::Ready(controller);
        update
    }
}
