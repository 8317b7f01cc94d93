/// Drag handle on the side panel edge

use crate::config::selectors::{DRAGGING_CLASS, RESIZE_HANDLE_CLASS, RESIZING_BODY_CLASS};
use crate::dom::listener::Listener;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeEvent {
    /// Raw width under the pointer: panel right edge minus pointer x.
    Drag(f64),
    Release,
}

pub type ResizeSink = Rc<dyn Fn(ResizeEvent)>;

/// A drag in progress. Dropping it detaches the document listeners.
struct Drag {
    _on_move: Listener,
    _on_up: Listener,
    handle: HtmlElement,
    body: Option<HtmlElement>,
}

impl Drop for Drag {
    fn drop(&mut self) {
        let _ = self.handle.class_list().remove_1(DRAGGING_CLASS);
        if let Some(body) = &self.body {
            let _ = body.class_list().remove_1(RESIZING_BODY_CLASS);
        }
    }
}

pub struct ResizeHandle {
    element: HtmlElement,
    panel: HtmlElement,
    drag: Rc<RefCell<Option<Drag>>>,
    _on_down: Listener,
}

impl ResizeHandle {
    pub fn install(document: &Document, panel: &HtmlElement, sink: ResizeSink) -> Option<Self> {
        let element: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
        let _ = element.class_list().add_1(RESIZE_HANDLE_CLASS);
        let _ = panel.style().set_property("position", "relative");
        panel.prepend_with_node_1(&element).ok()?;

        let drag: Rc<RefCell<Option<Drag>>> = Rc::new(RefCell::new(None));
        let on_down = {
            let document = document.clone();
            let panel = panel.clone();
            let handle = element.clone();
            let drag = drag.clone();
            Listener::new(&element, "mousedown", move |event: Event| {
                event.prevent_default();
                if drag.borrow().is_some() {
                    return;
                }
                let started = start_drag(&document, &panel, &handle, &drag, sink.clone());
                *drag.borrow_mut() = Some(started);
            })
        };

        Some(ResizeHandle {
            element,
            panel: panel.clone(),
            drag,
            _on_down: on_down,
        })
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.borrow().is_some()
    }
}

fn start_drag(
    document: &Document,
    panel: &HtmlElement,
    handle: &HtmlElement,
    drag: &Rc<RefCell<Option<Drag>>>,
    sink: ResizeSink,
) -> Drag {
    let _ = handle.class_list().add_1(DRAGGING_CLASS);
    let body = document.body();
    if let Some(body) = &body {
        let _ = body.class_list().add_1(RESIZING_BODY_CLASS);
    }

    let on_move = {
        let panel = panel.clone();
        let sink = sink.clone();
        Listener::new(document, "mousemove", move |event: Event| {
            let Some(pointer) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let right = panel.get_bounding_client_rect().right();
            sink(ResizeEvent::Drag(right - pointer.client_x() as f64));
        })
    };

    let on_up = {
        let drag = Rc::downgrade(drag);
        Listener::new(document, "mouseup", move |_event: Event| {
            sink(ResizeEvent::Release);
            if let Some(drag) = drag.upgrade() {
                let finished = drag.borrow_mut().take();
                drop(finished);
            }
        })
    };

    Drag {
        _on_move: on_move,
        _on_up: on_up,
        handle: handle.clone(),
        body,
    }
}

impl Drop for ResizeHandle {
    fn drop(&mut self) {
        // Cuts any drag in flight.
        self.drag.borrow_mut().take();
        self.element.remove();
        let _ = self.panel.style().remove_property("position");
    }
}
