//! Page runtime: owns the document and routes input to controllers.

use std::time::Instant;

use pagedom::{CustomEvent, Document, Element, Event, FocusState, Key, Modifiers, NodeId};

use crate::config::DisclosureConfig;
use crate::controller::{ActivateOptions, Controller, ControllerId, Effect};
use crate::registry::ControllerRegistry;
use crate::schema::MarkupSchema;

/// A document together with the disclosure controllers bound to it.
///
/// All input reaches controllers through [`Page::dispatch`], which plays the
/// role of the delegated listeners on each widget root plus the shared
/// document-level outside-click listener.
#[derive(Debug, Default)]
pub struct Page {
    doc: Document,
    focus: FocusState,
    registry: ControllerRegistry,
}

impl Page {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            focus: FocusState::new(),
            registry: ControllerRegistry::new(),
        }
    }

    pub fn from_element(element: Element) -> Self {
        Self::new(Document::from_element(element))
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focus.focused()
    }

    /// Convenience lookup of an element by its id attribute.
    pub fn element(&self, id: &str) -> Option<NodeId> {
        self.doc.get_element_by_id(id)
    }

    pub fn controller(&self, id: &str) -> Option<&Controller> {
        self.registry.get(id)
    }

    pub fn controller_mut(&mut self, id: &str) -> Option<&mut Controller> {
        self.registry.get_mut(id)
    }

    // Mounting

    /// Create controllers for every instance of `schema` under `scope`.
    ///
    /// Instances that fail to initialize are logged and skipped; their
    /// siblings are still mounted.
    pub fn mount(
        &mut self,
        scope: NodeId,
        schema: MarkupSchema,
        config: DisclosureConfig,
    ) -> Vec<ControllerId> {
        let roots = match schema.instance.as_deref() {
            Some(attr) => {
                let mut roots = self.doc.query_all(scope, attr);
                if self.doc.has_attr(scope, attr) {
                    roots.insert(0, scope);
                }
                roots
            }
            None => vec![scope],
        };

        let mut mounted = Vec::new();
        for root in roots {
            let controller =
                match Controller::init(&mut self.doc, root, schema.clone(), config.clone()) {
                    Ok(controller) => controller,
                    Err(e) => {
                        log::warn!("[page] {} not mounted: {}", schema.name, e);
                        continue;
                    }
                };
            match self.registry.register(controller) {
                Ok(id) => mounted.push(id),
                Err(e) => log::warn!("[page] {} not mounted: {}", schema.name, e),
            }
        }

        self.flush();
        mounted
    }

    /// Mount one accordion controller over every `[data-accordion]` under `scope`.
    pub fn mount_accordions(
        &mut self,
        scope: NodeId,
        config: DisclosureConfig,
    ) -> Option<ControllerId> {
        self.mount(scope, MarkupSchema::accordion(), config)
            .into_iter()
            .next()
    }

    /// Mount one content-tabs controller per `[data-ct]` root under `scope`.
    pub fn mount_content_tabs(
        &mut self,
        scope: NodeId,
        config: DisclosureConfig,
    ) -> Vec<ControllerId> {
        self.mount(scope, MarkupSchema::content_tabs(), config)
    }

    // Operations

    /// Forward to [`Controller::activate`]. Unknown controllers are ignored.
    pub fn activate(&mut self, controller: &str, id: &str, options: ActivateOptions) -> bool {
        let changed = match self.registry.get_mut(controller) {
            Some(c) => c.activate(&mut self.doc, id, options),
            None => {
                log::debug!("[page] no controller '{}'", controller);
                false
            }
        };
        self.flush();
        changed
    }

    /// Forward to [`Controller::toggle`].
    pub fn toggle(&mut self, controller: &str, id: &str) -> bool {
        self.activate(controller, id, ActivateOptions::toggle())
    }

    /// Drain change events emitted since the last call, including those
    /// queued by initial selection at mount time.
    ///
    /// Events accumulate until drained; hosts that consume changes through
    /// [`Controller::on_change`] instead should still call this periodically.
    pub fn take_events(&mut self) -> Vec<CustomEvent> {
        self.doc.take_dispatched()
    }

    // Time

    /// Advance running transitions and close fallbacks to `now`.
    pub fn tick(&mut self, now: Instant) {
        self.doc.advance(now);
        self.flush();
        for controller in self.registry.iter_mut() {
            controller.tick(&mut self.doc, now);
        }
        self.flush();
    }

    /// End every running transition immediately.
    pub fn finish_transitions(&mut self) {
        self.doc.finish_transitions();
        self.flush();
    }

    // Input

    pub fn dispatch(&mut self, event: Event) {
        log::trace!("[page] dispatch {:?}", event);
        match event {
            Event::Click { target } => self.click(target),
            Event::PointerDown { target } => {
                for controller in self.registry.iter_mut() {
                    if controller.handle_pointer_down(&mut self.doc, target) {
                        break;
                    }
                }
            }
            Event::Key {
                target,
                key,
                modifiers,
            } => self.key(target, key, modifiers),
            Event::TransitionEnd { target, transition } => {
                for controller in self.registry.iter_mut() {
                    if controller.handle_transition_end(&mut self.doc, target, transition) {
                        break;
                    }
                }
            }
            Event::Focus { target } => {
                self.focus.focus(target);
            }
            Event::Blur { target, new_target } => {
                if self.focus.focused() == Some(target) {
                    match new_target {
                        Some(next) => {
                            self.focus.focus(next);
                        }
                        None => {
                            self.focus.blur();
                        }
                    }
                }
            }
        }
        self.flush();
    }

    fn click(&mut self, target: NodeId) {
        let mut effect = None;
        for controller in self.registry.iter_mut() {
            effect = controller.handle_click(&mut self.doc, target);
            if effect.is_some() {
                break;
            }
        }
        if let Some(effect) = effect {
            self.apply(effect);
        }

        self.registry.dispatch_outside_click(&mut self.doc, target);
    }

    fn key(&mut self, target: Option<NodeId>, key: Key, modifiers: Modifiers) {
        if let Some(events) = self.focus.process_tab(key, &self.doc) {
            log::trace!("[page] sequential focus: {:?}", events);
            return;
        }

        let Some(target) = target.or(self.focus.focused()) else {
            return;
        };

        let mut effect = None;
        for controller in self.registry.iter_mut() {
            effect = controller.handle_key(&mut self.doc, target, key, modifiers);
            if effect.is_some() {
                break;
            }
        }
        if let Some(effect) = effect {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Focus(node) => {
                self.focus.focus(node);
            }
            Effect::Click(node) => self.click(node),
        }
    }

    /// Deliver queued transition-end signals to their controllers.
    fn flush(&mut self) {
        loop {
            let ended = self.doc.take_ended();
            if ended.is_empty() {
                break;
            }
            for event in ended {
                if let Event::TransitionEnd { target, transition } = event {
                    for controller in self.registry.iter_mut() {
                        if controller.handle_transition_end(&mut self.doc, target, transition) {
                            break;
                        }
                    }
                }
            }
        }
    }
}
