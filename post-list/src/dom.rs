//! 浏览器外壳 - 唯一持有可变状态并操作 DOM 的部分

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, Event, EventTarget, HtmlInputElement, KeyboardEvent, Response, Window};

use crate::config::MountOptions;
use crate::controller::PageState;
use crate::loader::{decode_index, LoadError};
use crate::models::{ListUpdate, RenderMode};
use crate::render::{
    render_active_filters, render_load_error, render_load_more, ACTION_ATTR, ENTERING_CLASS, FILE_ATTR, LOAD_MORE_ACTION, TAG_ATTR,
};
use crate::url_state::{from_query, page_url, to_query};

/// 新卡片插入后多久开始入场动画（毫秒）
const ENTRANCE_DELAY_MS: i32 = 50;

/// 页面上的协作元素；除结果容器外都可以缺失
struct Elements {
    container: Element,
    search_input: Option<HtmlInputElement>,
    search_button: Option<Element>,
    tag_cloud: Option<Element>,
    active_filters: Option<Element>,
    clear_filters: Option<Element>,
}

impl Elements {
    fn resolve(document: &Document, options: &MountOptions) -> Result<Self, JsValue> {
        let by_id = |id: &str| {
            if id.is_empty() {
                None
            } else {
                document.get_element_by_id(id)
            }
        };

        let container = by_id(&options.container_id)
            .ok_or_else(|| JsValue::from_str(&format!("找不到结果容器: #{}", options.container_id)))?;

        Ok(Self {
            container,
            search_input: by_id(&options.search_input_id)
                .and_then(|element| element.dyn_into::<HtmlInputElement>().ok()),
            search_button: by_id(&options.search_button_id),
            tag_cloud: by_id(&options.tag_cloud_id),
            active_filters: by_id(&options.active_filters_id),
            clear_filters: by_id(&options.clear_filters_id),
        })
    }
}

/// 文章列表页面
struct PostListPage {
    window: Window,
    elements: Elements,
    options: MountOptions,
    page_state: RefCell<PageState>,
    debounce_handle: Cell<Option<i32>>,
    debounce_callback: RefCell<Option<Closure<dyn FnMut()>>>,
    entrance_callback: Closure<dyn FnMut()>,
}

/// 挂载文章列表：解析参数、读取地址栏状态、绑定事件并加载索引
#[wasm_bindgen]
pub fn mount(options: JsValue) -> Result<(), JsValue> {
    let options: MountOptions = if options.is_undefined() || options.is_null() {
        MountOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsValue::from_str(&format!("解析挂载参数失败: {}", e)))?
    };

    let window = web_sys::window().ok_or("无法访问 window")?;
    let document = window.document().ok_or("无法访问 document")?;
    let elements = Elements::resolve(&document, &options)?;
    let state = from_query(&window.location().search()?);

    if let Some(input) = &elements.search_input {
        input.set_value(state.search_term());
    }

    let container = elements.container.clone();
    let entrance_callback = Closure::<dyn FnMut()>::new(move || reveal_cards(&container));

    let page = Rc::new(PostListPage {
        window,
        elements,
        options,
        page_state: RefCell::new(PageState::Loading(state)),
        debounce_handle: Cell::new(None),
        debounce_callback: RefCell::new(None),
        entrance_callback,
    });

    let debounced = Rc::clone(&page);
    *page.debounce_callback.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
        debounced.debounce_handle.set(None);
        debounced.run_search();
    }));

    attach_listeners(&page)?;
    fetch_index(&page);
    Ok(())
}

impl PostListPage {
    fn on_index_loaded(&self, data: &[u8]) {
        let posts = match decode_index(data) {
            Ok(posts) => posts,
            Err(e) => {
                self.show_load_error(&e);
                return;
            }
        };

        log(&format!("已加载 {} 篇文章", posts.len()));
        let update = self
            .page_state
            .borrow_mut()
            .finish_loading(posts, self.options.page_size);

        self.render_filters();
        self.apply_update(&update);

        // 加载期间筛选条件有变化时才改写地址栏
        let seeded = self.window.location().search().map(|query| from_query(&query)).unwrap_or_default();
        if self.page_state.borrow().state() != &seeded {
            self.sync_url();
        }
    }

    fn show_load_error(&self, error: &LoadError) {
        log_error(&format!("加载文章索引失败: {}", error));
        self.elements.container.set_inner_html(&render_load_error());
    }

    /// 修改筛选条件；有变化时刷新标签云、筛选展示、列表和地址栏
    ///
    /// 索引加载完成前只记录条件，加载完成后按记录的条件渲染。
    fn update_filters<F>(&self, change: F)
    where
        F: FnOnce(&mut PageState) -> Option<ListUpdate>,
    {
        let (update, loading) = {
            let mut page_state = self.page_state.borrow_mut();
            let update = change(&mut *page_state);
            (update, page_state.controller().is_none())
        };

        match update {
            Some(update) => {
                self.render_filters();
                self.apply_update(&update);
                self.sync_url();
            }
            None if loading => self.render_filters(),
            None => {}
        }
    }

    fn load_more(&self) {
        let update = self.page_state.borrow_mut().load_more();
        if let Some(update) = update {
            self.apply_update(&update);
        }
    }

    fn run_search(&self) {
        let term = self
            .elements
            .search_input
            .as_ref()
            .map(|input| input.value())
            .unwrap_or_default();
        self.update_filters(|page_state| page_state.set_search(&term));
    }

    fn on_search_input(&self) {
        self.cancel_debounce();

        let scheduled = self.debounce_callback.borrow().as_ref().map(|callback| {
            self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                self.options.debounce_ms,
            )
        });

        match scheduled {
            Some(Ok(handle)) => self.debounce_handle.set(Some(handle)),
            _ => self.run_search(),
        }
    }

    fn cancel_debounce(&self) {
        if let Some(handle) = self.debounce_handle.take() {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn on_container_click(&self, event: &Event) {
        let Some(target) = event_element(event) else {
            return;
        };

        // 卡片内的标签同样切换全局筛选，不跳转
        if let Some(tag) = closest_attr(&target, TAG_ATTR) {
            event.prevent_default();
            event.stop_propagation();
            self.update_filters(|page_state| page_state.toggle_tag(&tag));
            return;
        }

        if closest(&target, "a").is_some() {
            return;
        }

        if closest(&target, &format!("[{}=\"{}\"]", ACTION_ATTR, LOAD_MORE_ACTION)).is_some() {
            self.load_more();
            return;
        }

        if let Some(file) = closest_attr(&target, FILE_ATTR) {
            if let Err(e) = self.window.location().set_href(&file) {
                log_error(&format!("跳转失败: {:?}", e));
            }
        }
    }

    fn on_tag_click(&self, event: &Event) {
        if let Some(tag) = event_element(event).and_then(|target| closest_attr(&target, TAG_ATTR)) {
            self.update_filters(|page_state| page_state.toggle_tag(&tag));
        }
    }

    fn on_clear(&self) {
        self.cancel_debounce();
        self.update_filters(|page_state| page_state.clear_filters());
    }

    fn apply_update(&self, update: &ListUpdate) {
        let container = &self.elements.container;

        match update.mode {
            RenderMode::Replace => container.set_inner_html(&update.markup),
            RenderMode::Append => {
                let selector = format!("[{}=\"{}\"]", ACTION_ATTR, LOAD_MORE_ACTION);
                if let Ok(Some(button)) = container.query_selector(&selector) {
                    button.remove();
                }
                insert_html(container, &update.markup);
            }
        }

        if update.has_more() {
            insert_html(container, &render_load_more(update.remaining));
        }

        if let Err(e) = self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            self.entrance_callback.as_ref().unchecked_ref(),
            ENTRANCE_DELAY_MS,
        ) {
            log_error(&format!("无法启动入场动画: {:?}", e));
            reveal_cards(container);
        }
    }

    /// 刷新标签云、当前筛选展示、搜索框和清除按钮
    ///
    /// 标签云要等索引加载完成才有内容。
    fn render_filters(&self) {
        let page_state = self.page_state.borrow();
        let state = page_state.state();

        if let (Some(tag_cloud), Some(controller)) = (&self.elements.tag_cloud, page_state.controller()) {
            tag_cloud.set_inner_html(&controller.tag_cloud_markup());
        }
        if let Some(active_filters) = &self.elements.active_filters {
            active_filters.set_inner_html(&render_active_filters(state));
        }
        if let Some(input) = &self.elements.search_input {
            if input.value().trim() != state.search_term() {
                input.set_value(state.search_term());
            }
        }
        if let Some(clear) = &self.elements.clear_filters {
            if let Err(e) = clear.toggle_attribute_with_force("hidden", state.is_empty()) {
                log_error(&format!("更新清除按钮失败: {:?}", e));
            }
        }
    }

    /// 用 replaceState 写回地址栏，不产生新的历史记录
    fn sync_url(&self) {
        let query = to_query(self.page_state.borrow().state());

        let location = self.window.location();
        let path = location.pathname().unwrap_or_default();
        let hash = location.hash().unwrap_or_default();
        let url = page_url(&path, &query, &hash);

        let result = self
            .window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&url)));
        if let Err(e) = result {
            log_error(&format!("更新地址栏失败: {:?}", e));
        }
    }
}

fn attach_listeners(page: &Rc<PostListPage>) -> Result<(), JsValue> {
    let elements = &page.elements;

    let p = Rc::clone(page);
    listen(&elements.container, "click", move |event| p.on_container_click(&event))?;

    if let Some(input) = &elements.search_input {
        let p = Rc::clone(page);
        listen(input, "input", move |_| p.on_search_input())?;

        let p = Rc::clone(page);
        listen(input, "keydown", move |event| {
            let is_enter = event
                .dyn_ref::<KeyboardEvent>()
                .map_or(false, |key| key.key() == "Enter");
            if is_enter {
                event.prevent_default();
                p.cancel_debounce();
                p.run_search();
            }
        })?;
    }

    if let Some(button) = &elements.search_button {
        let p = Rc::clone(page);
        listen(button, "click", move |event| {
            event.prevent_default();
            p.cancel_debounce();
            p.run_search();
        })?;
    }

    for area in [&elements.tag_cloud, &elements.active_filters].into_iter().flatten() {
        let p = Rc::clone(page);
        listen(area, "click", move |event| p.on_tag_click(&event))?;
    }

    if let Some(clear) = &elements.clear_filters {
        let p = Rc::clone(page);
        listen(clear, "click", move |event| {
            event.prevent_default();
            p.on_clear();
        })?;
    }

    Ok(())
}

/// 请求索引文件；只请求一次，失败不重试
fn fetch_index(page: &Rc<PostListPage>) {
    let p = Rc::clone(page);
    let on_loaded = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| on_response(&p, value));
    let on_failure = failure_callback(page);

    let _ = page
        .window
        .fetch_with_str(&page.options.index_url)
        .then2(&on_loaded, &on_failure);

    on_loaded.forget();
    on_failure.forget();
}

fn on_response(page: &Rc<PostListPage>, value: JsValue) {
    let response: Response = match value.dyn_into() {
        Ok(response) => response,
        Err(other) => {
            page.show_load_error(&LoadError::Network(describe(&other)));
            return;
        }
    };

    if !response.ok() {
        page.show_load_error(&LoadError::Status(response.status()));
        return;
    }

    let body = match response.array_buffer() {
        Ok(body) => body,
        Err(e) => {
            page.show_load_error(&LoadError::Network(describe(&e)));
            return;
        }
    };

    let p = Rc::clone(page);
    let on_body = Closure::<dyn FnMut(JsValue)>::new(move |buffer: JsValue| {
        let data = Uint8Array::new(&buffer).to_vec();
        p.on_index_loaded(&data);
    });
    let on_failure = failure_callback(page);

    let _ = body.then2(&on_body, &on_failure);
    on_body.forget();
    on_failure.forget();
}

fn failure_callback(page: &Rc<PostListPage>) -> Closure<dyn FnMut(JsValue)> {
    let p = Rc::clone(page);
    Closure::<dyn FnMut(JsValue)>::new(move |error: JsValue| {
        p.show_load_error(&LoadError::Network(describe(&error)));
    })
}

fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // 监听器与页面同生命周期
    closure.forget();
    Ok(())
}

fn reveal_cards(container: &Element) {
    let Ok(cards) = container.query_selector_all(&format!(".{}", ENTERING_CLASS)) else {
        return;
    };
    for i in 0..cards.length() {
        if let Some(card) = cards.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
            let _ = card.class_list().remove_1(ENTERING_CLASS);
        }
    }
}

fn insert_html(container: &Element, markup: &str) {
    if markup.is_empty() {
        return;
    }
    if let Err(e) = container.insert_adjacent_html("beforeend", markup) {
        log_error(&format!("插入 HTML 失败: {:?}", e));
    }
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn closest(element: &Element, selector: &str) -> Option<Element> {
    element.closest(selector).ok().flatten()
}

fn closest_attr(element: &Element, attr: &str) -> Option<String> {
    closest(element, &format!("[{}]", attr))?.get_attribute(attr)
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn log(message: &str) {
    console::log_1(&JsValue::from_str(message));
}

fn log_error(message: &str) {
    console::error_1(&JsValue::from_str(message));
}
