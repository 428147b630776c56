//! Sway window lookup and scratchpad focus through `swaymsg`.

use serde_json::Value;

use crate::platform::{CommandRunner, WindowManager};
use crate::logger::{self, LogLevel};

/// Talks to sway via its IPC client.
pub struct SwayWindows<'a> {
    runner: &'a dyn CommandRunner,
    command: String,
}

impl<'a> SwayWindows<'a> {
    pub fn new(runner: &'a dyn CommandRunner, command: impl Into<String>) -> Self {
        Self {
            runner,
            command: command.into(),
        }
    }

    fn swaymsg(&self, args: &[&str]) -> Option<String> {
        let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        match self.runner.run(&self.command, &args, None) {
            Ok(out) if out.success => Some(out.stdout),
            Ok(out) => {
                logger::log(
                    LogLevel::Debug,
                    "SWAY",
                    format!(
                        "{} {} exited with {:?}: {}",
                        self.command,
                        args.join(" "),
                        out.code,
                        out.stderr.trim()
                    ),
                );
                None
            }
            Err(e) => {
                logger::log(
                    LogLevel::Debug,
                    "SWAY",
                    format!("Could not run {}: {e}", self.command),
                );
                None
            }
        }
    }
}

impl WindowManager for SwayWindows<'_> {
    fn is_app_running(&self, app_id: &str) -> bool {
        let Some(tree) = self.swaymsg(&["-t", "get_tree", "-r"]) else {
            return false;
        };

        match serde_json::from_str::<Value>(&tree) {
            Ok(root) => tree_has_app(&root, app_id),
            Err(e) => {
                logger::log(
                    LogLevel::Warning,
                    "SWAY",
                    format!("Unreadable window tree: {e}"),
                );
                false
            }
        }
    }

    fn focus_app(&self, app_id: &str) {
        let criteria = format!("[app_id=\"{app_id}\"]");
        if self.swaymsg(&[&criteria, "scratchpad", "show"]).is_none() {
            logger::log(
                LogLevel::Warning,
                "SWAY",
                format!("Could not show '{app_id}' from the scratchpad"),
            );
        }
    }
}

/// Depth-first search over tiling and floating children.
///
/// Wayland clients are matched on `app_id`, Xwayland clients on
/// `window_properties.class`.
fn tree_has_app(node: &Value, app_id: &str) -> bool {
    let matches_app_id = node.get("app_id").and_then(Value::as_str) == Some(app_id);
    let matches_class = node
        .get("window_properties")
        .and_then(|p| p.get("class"))
        .and_then(Value::as_str)
        == Some(app_id);

    if matches_app_id || matches_class {
        return true;
    }

    ["nodes", "floating_nodes"].iter().any(|key| {
        node.get(*key)
            .and_then(Value::as_array)
            .is_some_and(|children| children.iter().any(|child| tree_has_app(child, app_id)))
    })
}
