//! Focus scope stack.
//!
//! A scene keeps several focusable containers alive at once: a settings
//! grid under a confirmation dialog under a help overlay. The stack
//! decides which of them owns directional input: whoever is on top.
//! Containers push their scope when they come up, pop it when they
//! leave, and check `is_top` before consuming input.

/// Opaque token naming one focusable container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// Stack of scopes; the top one owns directional input.
#[derive(Debug, Default)]
pub struct FocusStack {
    scopes: Vec<ScopeId>,
}

impl FocusStack {
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Puts `scope` on top. A scope already in the stack moves to the
    /// top instead of appearing twice.
    pub fn push(&mut self, scope: ScopeId) {
        if let Some(at) = self.scopes.iter().position(|s| *s == scope) {
            log::debug!("focus scope {scope:?} re-pushed from depth {at}");
            self.scopes.remove(at);
        }
        self.scopes.push(scope);
    }

    /// Removes `scope` wherever it sits. Containers tear down in any
    /// order, so popping from the middle keeps the rest of the stack
    /// intact.
    pub fn pop(&mut self, scope: ScopeId) {
        match self.scopes.iter().position(|s| *s == scope) {
            Some(at) => {
                if at + 1 != self.scopes.len() {
                    log::warn!(
                        "focus scope {scope:?} popped from under {} others",
                        self.scopes.len() - at - 1
                    );
                }
                self.scopes.remove(at);
            }
            None => log::warn!("focus scope {scope:?} popped but not on the stack"),
        }
    }

    pub fn top(&self) -> Option<ScopeId> {
        self.scopes.last().copied()
    }

    /// Whether `scope` currently owns directional input.
    pub fn is_top(&self, scope: ScopeId) -> bool {
        self.top() == Some(scope)
    }

    pub fn contains(&self, scope: ScopeId) -> bool {
        self.scopes.contains(&scope)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
