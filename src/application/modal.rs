use super::ports::{RendererFactory, RendererHandle};
use crate::domain::logging::{LogComponent, get_logger};

/// Enlarged copy of one chart shown in the expand modal.
///
/// The modal renderer is created once and reused; the source renderer is
/// only ever read.
#[derive(Default)]
pub struct ModalMirror {
    renderer: Option<Box<dyn RendererHandle>>,
    widget_id: Option<String>,
}

impl ModalMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widget_id(&self) -> Option<&str> {
        self.widget_id.as_deref()
    }

    pub fn is_showing(&self, widget_id: &str) -> bool {
        self.widget_id.as_deref() == Some(widget_id)
    }

    /// Shows `widget_id` in the modal. Returns `false` when the modal
    /// container is missing.
    pub fn open(&mut self, widget_id: &str, source: &dyn RendererHandle, factory: &dyn RendererFactory) -> bool {
        if self.renderer.is_none() {
            self.renderer = factory.create_modal();
        }
        if self.renderer.is_none() {
            get_logger().warn(LogComponent::Application("ModalMirror"), "⚠️ Modal container is missing");
            return false;
        }
        self.widget_id = Some(widget_id.to_string());
        self.sync(widget_id, source);
        true
    }

    /// Re-copies the source option while the modal shows `widget_id`.
    pub fn sync(&mut self, widget_id: &str, source: &dyn RendererHandle) {
        if !self.is_showing(widget_id) {
            return;
        }
        let (Some(renderer), Some(option)) = (self.renderer.as_mut(), source.current_option()) else {
            return;
        };
        renderer.set_option(&option, true);
        renderer.resize();
    }

    pub fn close(&mut self) {
        self.widget_id = None;
    }

    pub fn resize(&mut self) {
        if self.widget_id.is_none() {
            return;
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize();
        }
    }
}
