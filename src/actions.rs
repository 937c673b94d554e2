//! Gesture-to-action bindings
//!
//! Detections in run mode go through a registry mapping gesture names to
//! actions: launch a program, or call back into the host. A failing
//! binding is reported and swallowed so it cannot take matching down.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// What to do when a gesture is detected
pub enum Action {
    /// Spawn a program and leave it running
    Command(PathBuf),
    /// Invoke a host callback with the gesture name
    Callback(Box<dyn FnMut(&str) -> anyhow::Result<()> + Send>),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Command(path) => f.debug_tuple("Command").field(path).finish(),
            Action::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Name to action table, fixed once matching starts
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Action>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from config bindings
    pub fn from_bindings(bindings: &[crate::config::ActionBinding]) -> Self {
        let mut registry = Self::new();
        for binding in bindings {
            registry.bind(binding.gesture.clone(), Action::Command(binding.command.clone()));
        }
        registry
    }

    /// Bind a gesture name to an action, replacing any previous binding
    pub fn bind(&mut self, gesture: impl Into<String>, action: Action) {
        self.actions.insert(gesture.into(), action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run the action bound to a gesture. Unknown names and failed
    /// dispatches are reported on stderr, nothing else happens.
    pub fn dispatch(&mut self, gesture: &str) {
        let Some(action) = self.actions.get_mut(gesture) else {
            eprintln!("No action bound for '{}'", gesture);
            return;
        };
        match action {
            Action::Command(path) => match Command::new(path.as_path()).spawn() {
                Ok(child) => {
                    println!("Launched {} (pid {}) for '{}'", path.display(), child.id(), gesture)
                }
                Err(e) => eprintln!("Failed to launch {}: {}", path.display(), e),
            },
            Action::Callback(callback) => {
                if let Err(e) = callback(gesture) {
                    eprintln!("Action for '{}' failed: {}", gesture, e);
                }
            }
        }
    }
}
