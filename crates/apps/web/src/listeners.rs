//! DOM event bindings with explicit lifetimes.
//!
//! An [`EventBinding`] owns its closure and removes the listener when
//! dropped. [`DocumentListeners`] attaches the global move/release pair for
//! the duration of one pan gesture.

use viewport::PointerSubscriber;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

pub struct EventBinding {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
    bound: bool,
}

impl EventBinding {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
            bound: true,
        })
    }

    /// Non-passive variant, for handlers that call `prevent_default` on
    /// wheel or touch events.
    pub fn active(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
            bound: true,
        })
    }

    /// Remove the listener but keep the closure alive. Safe to call from
    /// inside the handler itself.
    pub fn unbind(&mut self) {
        if self.bound {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
            self.bound = false;
        }
    }
}

impl Drop for EventBinding {
    fn drop(&mut self) {
        self.unbind();
    }
}

/// Global `mousemove`/`mouseup` listeners on the document, present only while
/// a pan is active.
pub struct DocumentListeners {
    target: Option<EventTarget>,
    on_move: fn(web_sys::MouseEvent),
    on_up: fn(web_sys::MouseEvent),
    active: Vec<EventBinding>,
    // A closure can't be freed while it runs, and `detach` is normally
    // reached from the mouseup handler; these drop on the next `attach`.
    retired: Vec<EventBinding>,
}

impl DocumentListeners {
    pub fn new(
        target: Option<EventTarget>,
        on_move: fn(web_sys::MouseEvent),
        on_up: fn(web_sys::MouseEvent),
    ) -> Self {
        Self {
            target,
            on_move,
            on_up,
            active: Vec::new(),
            retired: Vec::new(),
        }
    }

    fn bind(
        target: &EventTarget,
        event: &'static str,
        handler: fn(web_sys::MouseEvent),
    ) -> Option<EventBinding> {
        let binding = EventBinding::new(target, event, move |ev: Event| {
            handler(ev.unchecked_into());
        });
        match binding {
            Ok(binding) => Some(binding),
            Err(err) => {
                crate::warn(&format!("failed to attach {event} listener: {err:?}"));
                None
            }
        }
    }
}

impl PointerSubscriber for DocumentListeners {
    fn attach(&mut self) {
        self.retired.clear();
        let Some(target) = self.target.clone() else {
            return;
        };
        self.active.extend(Self::bind(&target, "mousemove", self.on_move));
        self.active.extend(Self::bind(&target, "mouseup", self.on_up));
    }

    fn detach(&mut self) {
        for mut binding in self.active.drain(..) {
            binding.unbind();
            self.retired.push(binding);
        }
    }
}
