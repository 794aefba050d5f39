use sitemirror::ui::*;

pub struct NullUiHandler;

impl NullUiHandler {
    pub fn new() -> Self {
        Self
    }
}

impl MirrorUiHandler for NullUiHandler {
    fn event(&mut self, _e: &UiEvent) {}
}
