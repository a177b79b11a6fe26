//! Registry of the controllers bound to a page.

use pagedom::{Document, NodeId};

use crate::controller::{Controller, ControllerId};
use crate::error::RegisterError;

/// The page-wide outside-click listener.
///
/// Installed at most once no matter how many controllers opt in. Controllers
/// subscribe by id; the listener walks the current subscriber list on every
/// click, so controllers registered after installation are covered too.
#[derive(Debug, Default)]
pub struct OutsideClickListener {
    installed: bool,
    subscribers: Vec<ControllerId>,
}

impl OutsideClickListener {
    /// Install the listener. Returns true only on the first call.
    pub fn install(&mut self) -> bool {
        if self.installed {
            return false;
        }
        self.installed = true;
        log::debug!("[registry] outside-click listener installed");
        true
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn subscribe(&mut self, id: ControllerId) {
        if !self.subscribers.contains(&id) {
            self.subscribers.push(id);
        }
    }

    pub fn subscribers(&self) -> &[ControllerId] {
        &self.subscribers
    }
}

/// Registry managing every controller on a page.
///
/// The registry tracks:
/// - All controllers, in registration order
/// - The shared outside-click listener and its subscribers
#[derive(Debug, Default)]
pub struct ControllerRegistry {
    controllers: Vec<Controller>,
    outside_click: OutsideClickListener,
}

impl ControllerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller.
    ///
    /// Controllers configured to close on outside clicks subscribe to the
    /// shared listener, installing it if this is the first one.
    pub fn register(&mut self, controller: Controller) -> Result<ControllerId, RegisterError> {
        let id = controller.id().clone();
        if self.get(id.as_str()).is_some() {
            return Err(RegisterError::DuplicateController(id.to_string()));
        }

        if controller.config().close_on_outside_click {
            self.outside_click.install();
            self.outside_click.subscribe(id.clone());
        }

        self.controllers.push(controller);
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.id().as_str() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Controller> {
        self.controllers.iter_mut().find(|c| c.id().as_str() == id)
    }

    /// The controller owning `node` as a trigger or panel.
    pub fn owner_of(&self, node: NodeId) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.owns(node))
    }

    pub fn outside_click(&self) -> &OutsideClickListener {
        &self.outside_click
    }

    /// Let every subscribed controller close the items `target` falls outside of.
    pub fn dispatch_outside_click(&mut self, doc: &mut Document, target: NodeId) -> usize {
        if !self.outside_click.is_installed() {
            return 0;
        }

        let mut closed = 0;
        for id in &self.outside_click.subscribers {
            if let Some(controller) = self.controllers.iter_mut().find(|c| c.id() == id) {
                closed += controller.close_outside(doc, target);
            }
        }
        if closed > 0 {
            log::debug!("[registry] outside click closed {} items", closed);
        }
        closed
    }

    /// Get total number of controllers.
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Check if there are no controllers.
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Iterate over all controllers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Controller> {
        self.controllers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Controller> {
        self.controllers.iter_mut()
    }
}
