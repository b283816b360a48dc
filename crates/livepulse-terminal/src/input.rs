//! Key handling for the terminal ticker.

use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the ticker to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the ticker.
    Quit,
    /// Freeze or resume the marquee.
    TogglePause,
    /// Switch between animated and static display.
    ToggleReducedMotion,
    /// Terminal was resized; redraw from scratch.
    Redraw,
}

/// Key binding configuration.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    /// Key code.
    pub code: KeyCode,
    /// Required modifiers.
    pub modifiers: KeyModifiers,
    /// Bound action.
    pub action: Action,
}

impl KeyBinding {
    /// Create a new key binding.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: KeyModifiers, action: Action) -> Self {
        Self {
            code,
            modifiers,
            action,
        }
    }

    /// Create a simple key binding without modifiers.
    #[must_use]
    pub const fn simple(code: KeyCode, action: Action) -> Self {
        Self::new(code, KeyModifiers::NONE, action)
    }

    /// Check if this binding matches a key event.
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.code == self.code && event.modifiers.contains(self.modifiers)
    }
}

/// Maps crossterm events onto ticker actions.
#[derive(Debug, Clone)]
pub struct InputHandler {
    bindings: Vec<KeyBinding>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self {
            bindings: vec![
                KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL, Action::Quit),
                KeyBinding::simple(KeyCode::Char('q'), Action::Quit),
                KeyBinding::simple(KeyCode::Esc, Action::Quit),
                KeyBinding::simple(KeyCode::Char('p'), Action::TogglePause),
                KeyBinding::simple(KeyCode::Char(' '), Action::TogglePause),
                KeyBinding::simple(KeyCode::Char('m'), Action::ToggleReducedMotion),
            ],
        }
    }
}

impl InputHandler {
    /// Handler with the default bindings: `q`/`Esc`/`Ctrl+C` quit, `p`/space
    /// pause, `m` toggles motion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler with no bindings.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Add a key binding. Earlier bindings win.
    pub fn add_binding(&mut self, binding: KeyBinding) {
        self.bindings.push(binding);
    }

    /// Registered bindings.
    #[must_use]
    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    /// Action for `event`, if any.
    #[must_use]
    pub fn convert(&self, event: &CrosstermEvent) -> Option<Action> {
        match event {
            CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => self
                .bindings
                .iter()
                .find(|binding| binding.matches(key))
                .map(|binding| binding.action),
            CrosstermEvent::Resize(_, _) => Some(Action::Redraw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> CrosstermEvent {
        CrosstermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_key_binding_simple() {
        let binding = KeyBinding::simple(KeyCode::Char('p'), Action::TogglePause);
        let event = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE);
        assert!(binding.matches(&event));
    }

    #[test]
    fn test_key_binding_with_modifiers() {
        let binding = KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL, Action::Quit);
        assert!(binding.matches(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!binding.matches(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_default_bindings() {
        let handler = InputHandler::new();
        assert_eq!(handler.convert(&key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(handler.convert(&key(KeyCode::Esc)), Some(Action::Quit));
        assert_eq!(
            handler.convert(&key(KeyCode::Char('p'))),
            Some(Action::TogglePause)
        );
        assert_eq!(
            handler.convert(&key(KeyCode::Char('m'))),
            Some(Action::ToggleReducedMotion)
        );
        assert_eq!(handler.convert(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let handler = InputHandler::new();
        let event = CrosstermEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(handler.convert(&event), Some(Action::Quit));
        assert_eq!(handler.convert(&key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn test_release_ignored() {
        let handler = InputHandler::new();
        let event = CrosstermEvent::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(handler.convert(&event), None);
    }

    #[test]
    fn test_resize_redraws() {
        let handler = InputHandler::empty();
        assert_eq!(
            handler.convert(&CrosstermEvent::Resize(100, 30)),
            Some(Action::Redraw)
        );
        assert!(handler.bindings().is_empty());
    }

    #[test]
    fn test_custom_binding() {
        let mut handler = InputHandler::empty();
        handler.add_binding(KeyBinding::simple(KeyCode::Char('x'), Action::Quit));
        assert_eq!(handler.convert(&key(KeyCode::Char('x'))), Some(Action::Quit));
    }
}
