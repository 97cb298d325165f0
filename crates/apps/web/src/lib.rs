use std::cell::RefCell;
use std::sync::OnceLock;

use chat::{ChatSession, Ticket};
use viewport::{Layer, ViewportController};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Event, HtmlButtonElement, HtmlElement, HtmlImageElement, HtmlInputElement,
    HtmlSelectElement, KeyboardEvent, MouseEvent, WheelEvent,
};

mod listeners;
mod options;
mod relay;

use listeners::{DocumentListeners, EventBinding};
pub use options::{ControlIds, MountOptions};

static PANIC_HOOK_SET: OnceLock<()> = OnceLock::new();

pub(crate) fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

pub(crate) fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

/// Elements the app writes to. Chat elements are optional so the viewer can
/// run without the widget.
struct Dom {
    document: Document,
    image: HtmlImageElement,
    chat_window: Option<HtmlElement>,
    chat_messages: Option<HtmlElement>,
    chat_input: Option<HtmlInputElement>,
    chat_send: Option<HtmlButtonElement>,
    chat_toggle: Option<HtmlElement>,
    layer_select: Option<HtmlSelectElement>,
}

struct App {
    options: MountOptions,
    dom: Dom,
    viewport: ViewportController<DocumentListeners>,
    rendered_layer: Option<Layer>,
    chat: ChatSession,
    chat_open: bool,
    // Dropping these removes the listeners.
    _bindings: Vec<EventBinding>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Run `f` against the mounted app. Returns `None` when nothing is mounted
/// or the state is already borrowed further up the stack.
fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| match cell.try_borrow_mut() {
        Ok(mut guard) => guard.as_mut().map(f),
        Err(_) => {
            warn("app state re-entered; event dropped");
            None
        }
    })
}

fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    if id.is_empty() {
        return None;
    }
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

impl App {
    fn render_viewport(&mut self) {
        let layer = self.viewport.active_layer();
        if self.rendered_layer != Some(layer) {
            self.dom.image.set_src(&layer.asset_url(&self.options.asset_base));
            self.dom.image.set_alt(&layer.alt_text());
            if let Some(select) = &self.dom.layer_select {
                select.set_value(layer.name());
            }
            self.rendered_layer = Some(layer);
        }

        let style = self.viewport.image_style();
        let css = self.dom.image.style();
        for (property, value) in style.properties() {
            if let Err(err) = css.set_property(property, value) {
                warn(&format!("failed to set {property}: {err:?}"));
            }
        }
    }

    fn render_chat(&self) {
        let busy = self.chat.is_busy();

        if let Some(window) = &self.dom.chat_window {
            window.set_hidden(!self.chat_open);
        }
        if let Some(toggle) = &self.dom.chat_toggle {
            toggle.set_text_content(Some(if self.chat_open { "Chat Close" } else { "AI Guide" }));
        }
        if let Some(input) = &self.dom.chat_input {
            input.set_disabled(busy);
        }
        if let Some(send) = &self.dom.chat_send {
            send.set_disabled(busy);
        }

        let Some(messages) = &self.dom.chat_messages else {
            return;
        };
        messages.set_inner_html("");
        for turn in self.chat.history().turns() {
            self.append_message(messages, &format!("message {}", turn.sender.as_str()), &turn.text);
        }
        if busy {
            self.append_message(messages, "message bot typing", "...Typing");
        }
        messages.set_scroll_top(messages.scroll_height());
    }

    fn append_message(&self, parent: &HtmlElement, class: &str, text: &str) {
        let node = match self.dom.document.create_element("div") {
            Ok(node) => node,
            Err(err) => {
                warn(&format!("create_element failed: {err:?}"));
                return;
            }
        };
        node.set_class_name(class);
        node.set_text_content(Some(text));
        if let Err(err) = parent.append_child(&node) {
            warn(&format!("append_child failed: {err:?}"));
        }
    }
}

fn on_document_move(ev: MouseEvent) {
    with_app(|app| {
        if app
            .viewport
            .update_pan(f64::from(ev.client_x()), f64::from(ev.client_y()))
        {
            app.render_viewport();
        }
    });
}

fn on_document_up(_ev: MouseEvent) {
    with_app(|app| {
        app.viewport.end_pan();
        app.render_viewport();
    });
}

fn on_container_down(ev: Event) {
    let ev: MouseEvent = ev.unchecked_into();
    ev.prevent_default();
    with_app(|app| {
        app.viewport
            .begin_pan(f64::from(ev.client_x()), f64::from(ev.client_y()));
        app.render_viewport();
    });
}

fn on_container_wheel(ev: Event) {
    let ev: WheelEvent = ev.unchecked_into();
    ev.prevent_default();
    with_app(|app| {
        app.viewport.on_wheel(ev.delta_y());
        app.render_viewport();
    });
}

fn click_zoom_in() {
    zoom_in();
}

fn click_zoom_out() {
    zoom_out();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    PANIC_HOOK_SET.get_or_init(console_error_panic_hook::set_once);
    Ok(())
}

/// Attach the viewer (and the chat widget, if its elements exist) to the
/// page. `options_json` may be empty for all defaults.
///
/// Mounting again replaces the previous instance.
#[wasm_bindgen]
pub fn mount(options_json: &str) -> Result<(), JsValue> {
    let options = MountOptions::from_json(options_json)
        .map_err(|err| JsValue::from_str(&format!("invalid mount options: {err}")))?;

    unmount();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let container: HtmlElement = element_by_id(&document, &options.container_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{}", options.container_id)))?;
    let image: HtmlImageElement = element_by_id(&document, &options.image_id)
        .ok_or_else(|| JsValue::from_str(&format!("missing img#{}", options.image_id)))?;

    let ids = &options.controls;
    let dom = Dom {
        image,
        chat_window: element_by_id(&document, &ids.chat_window),
        chat_messages: element_by_id(&document, &ids.chat_messages),
        chat_input: element_by_id(&document, &ids.chat_input),
        chat_send: element_by_id(&document, &ids.chat_send),
        chat_toggle: element_by_id(&document, &ids.chat_toggle),
        layer_select: element_by_id(&document, &ids.layer_select),
        document: document.clone(),
    };

    let mut bindings = vec![
        EventBinding::new(&container, "mousedown", on_container_down)?,
        EventBinding::active(&container, "wheel", on_container_wheel)?,
    ];
    let clicks: [(&str, fn()); 4] = [
        (ids.zoom_in.as_str(), click_zoom_in),
        (ids.zoom_out.as_str(), click_zoom_out),
        (ids.chat_toggle.as_str(), chat_toggle),
        (ids.chat_close.as_str(), chat_close),
    ];
    for (id, action) in clicks {
        if let Some(el) = element_by_id::<HtmlElement>(&document, id) {
            bindings.push(EventBinding::new(&el, "click", move |_| action())?);
        }
    }
    if let Some(select) = &dom.layer_select {
        fill_layer_options(&document, select)?;
        let source = select.clone();
        bindings.push(EventBinding::new(select, "change", move |_| {
            set_layer(&source.value());
        })?);
    }
    if let Some(send) = &dom.chat_send {
        bindings.push(EventBinding::new(send, "click", |_| chat_send_input())?);
    }
    if let Some(input) = &dom.chat_input {
        bindings.push(EventBinding::new(input, "keydown", |ev: Event| {
            let ev: KeyboardEvent = ev.unchecked_into();
            if ev.key() == "Enter" {
                chat_send_input();
            }
        })?);
    }

    let listeners = DocumentListeners::new(
        Some(document.into()),
        on_document_move,
        on_document_up,
    );
    let mut app = App {
        options,
        dom,
        viewport: ViewportController::new(listeners),
        rendered_layer: None,
        chat: ChatSession::new(),
        chat_open: false,
        _bindings: bindings,
    };
    app.render_viewport();
    app.render_chat();

    APP.with(|cell| *cell.borrow_mut() = Some(app));
    log("explorer mounted");
    Ok(())
}

/// Replace the selector's options with one per layer, in display order.
fn fill_layer_options(document: &Document, select: &HtmlSelectElement) -> Result<(), JsValue> {
    select.set_inner_html("");
    for layer in Layer::ALL {
        let option = document.create_element("option")?;
        option.set_attribute("value", layer.name())?;
        option.set_text_content(Some(layer.label()));
        select.append_child(&option)?;
    }
    Ok(())
}

/// Detach every listener and drop all viewer and chat state.
#[wasm_bindgen]
pub fn unmount() {
    let app = APP.with(|cell| cell.try_borrow_mut().ok().and_then(|mut s| s.take()));
    if let Some(mut app) = app {
        app.viewport.end_pan();
        drop(app);
    }
}

#[wasm_bindgen]
pub fn zoom_in() -> Option<f64> {
    with_app(|app| {
        let zoom = app.viewport.zoom_in();
        app.render_viewport();
        zoom
    })
}

#[wasm_bindgen]
pub fn zoom_out() -> Option<f64> {
    with_app(|app| {
        let zoom = app.viewport.zoom_out();
        app.render_viewport();
        zoom
    })
}

/// Select a layer by name (`Visible`, `Infrared`, `Xray`). Unknown names are
/// logged and leave the current layer in place.
#[wasm_bindgen]
pub fn set_layer(name: &str) -> bool {
    with_app(|app| match app.viewport.select_layer(name) {
        Ok(_) => {
            app.render_viewport();
            true
        }
        Err(err) => {
            warn(&err.to_string());
            app.rendered_layer = None;
            app.render_viewport();
            false
        }
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn reset_view() {
    with_app(|app| {
        app.viewport.reset();
        app.render_viewport();
    });
}

/// Current viewport state as JSON.
#[wasm_bindgen]
pub fn viewport_state() -> Option<String> {
    with_app(|app| serde_json::to_string(&app.viewport.state()).ok()).flatten()
}

/// Chat history as a JSON array of `{sender, text}`.
#[wasm_bindgen]
pub fn chat_history() -> Option<String> {
    with_app(|app| serde_json::to_string(app.chat.history()).ok()).flatten()
}

#[wasm_bindgen]
pub fn chat_is_busy() -> bool {
    with_app(|app| app.chat.is_busy()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn chat_toggle() {
    with_app(|app| {
        app.chat_open = !app.chat_open;
        app.render_chat();
    });
}

#[wasm_bindgen]
pub fn chat_close() {
    with_app(|app| {
        app.chat_open = false;
        app.render_chat();
    });
}

fn chat_send_input() {
    let text = with_app(|app| app.dom.chat_input.as_ref().map(|input| input.value())).flatten();
    if let Some(text) = text {
        chat_send(&text);
    }
}

/// Submit one message. Ignored when blank or while a reply is pending.
/// Returns whether a request was started.
#[wasm_bindgen]
pub fn chat_send(text: &str) -> bool {
    let started = with_app(|app| {
        let pending = app.chat.submit(text)?;
        if let Some(input) = &app.dom.chat_input {
            input.set_value("");
        }
        app.render_chat();
        Some((
            pending,
            app.options.chat_endpoint.clone(),
            app.options.chat_timeout_ms,
        ))
    })
    .flatten();

    let Some((pending, endpoint, timeout_ms)) = started else {
        return false;
    };

    if timeout_ms > 0 {
        schedule_expiry(pending.ticket, timeout_ms);
    }
    spawn_local(async move {
        let outcome = relay::post_chat(&endpoint, &pending.request).await;
        finish_request(pending.ticket, outcome);
    });
    true
}

fn finish_request(ticket: Ticket, outcome: Result<String, chat::RelayFailure>) {
    with_app(|app| {
        if app.chat.complete(ticket, outcome) {
            app.render_chat();
        }
    });
}

fn schedule_expiry(ticket: Ticket, timeout_ms: u32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(move || {
        with_app(|app| {
            if app.chat.expire(ticket) {
                warn(&format!("chat request {} timed out", ticket.id()));
                app.render_chat();
            }
        });
    });
    let timeout = i32::try_from(timeout_ms).unwrap_or(i32::MAX);
    if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        timeout,
    ) {
        warn(&format!("failed to schedule chat timeout: {err:?}"));
    }
}
