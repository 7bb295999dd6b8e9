//! Browser collaborators: DOM-measured viewport and hash navigation

use web_sys::window;

use super::{Navigator, ViewportProvider};
use crate::sim::Viewport;

/// Measures the play area element on every call (tracks resizes for free)
#[derive(Debug, Clone)]
pub struct DomViewport {
    element_id: String,
}

impl DomViewport {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

impl ViewportProvider for DomViewport {
    fn viewport(&self) -> Option<Viewport> {
        let element = window()?.document()?.get_element_by_id(&self.element_id)?;
        let (w, h) = (element.client_width(), element.client_height());
        // Not laid out yet
        if w <= 0 || h <= 0 {
            return None;
        }
        Some(Viewport::new(w as f32, h as f32))
    }
}

/// Switches the page to another screen by setting the location hash
#[derive(Debug, Clone)]
pub struct HashNavigator {
    route: String,
}

impl HashNavigator {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
        }
    }
}

impl Navigator for HashNavigator {
    fn session_ended(&mut self) {
        if let Some(w) = window() {
            if let Err(e) = w.location().set_hash(&self.route) {
                log::warn!("Navigation to {} failed: {:?}", self.route, e);
            }
        }
    }
}
