//! Snapshot rendering helpers.
//!
//! Plain-text dumps of a scene's tree and of a render pass, stable enough to
//! compare in snapshot tests.

use std::fmt::Write;

use crate::dom::node::NodeId;
use crate::geometry::Region;
use crate::scene::Scene;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Describe the tree under the root, one node per line, children indented
/// two spaces. Orphans follow under an `orphans:` heading.
///
/// Each line reads `name (Type) x,y wxh` followed by any of the markers
/// `clickable`, `disabled`, `hidden`, `tab=N`, `focused`, `hovered`.
///
/// # Examples
///
/// ```
/// use stagegraph::scene::Scene;
/// use stagegraph::testing::tree_to_string;
///
/// let scene = Scene::default();
/// assert_eq!(tree_to_string(&scene), "mainStage (Stage) 0,0 800x600 clickable focused");
/// ```
pub fn tree_to_string(scene: &Scene) -> String {
    let mut lines = Vec::new();
    write_subtree(scene, scene.root, 0, &mut lines);
    let orphans = scene.orphans();
    if !orphans.is_empty() {
        lines.push("orphans:".to_owned());
        for orphan in orphans {
            if let Some(id) = scene.store.resolve(&orphan) {
                write_subtree(scene, id, 1, &mut lines);
            }
        }
    }
    lines.join("\n")
}

/// Run a render pass and describe each item on its own line as
/// `name x,y wxh` plus `: content` when the node draws something.
pub fn render_to_string(scene: &mut Scene) -> String {
    scene
        .render()
        .into_iter()
        .map(|item| {
            let mut line = format!("{} {}", item.name, describe_bounds(item.bounds));
            if let Some(content) = item.content {
                let _ = write!(line, ": {content}");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn describe_bounds(bounds: Region) -> String {
    format!("{},{} {}x{}", bounds.x, bounds.y, bounds.width, bounds.height)
}

fn write_subtree(scene: &Scene, id: NodeId, depth: usize, lines: &mut Vec<String>) {
    let Some(node) = scene.store.get(id) else {
        return;
    };
    let core = node.core();
    let mut line = format!(
        "{}{} ({}) {}",
        "  ".repeat(depth),
        node.name(),
        node.type_name(),
        describe_bounds(scene.world_bounds(id))
    );
    let mut markers = Vec::new();
    if core.clickable {
        markers.push("clickable".to_owned());
    }
    if !core.enabled {
        markers.push("disabled".to_owned());
    }
    if core.hidden {
        markers.push("hidden".to_owned());
    }
    if core.tab_enabled {
        markers.push(format!("tab={}", core.tab_priority));
    }
    if scene.has_keyboard_focus(node.name()) {
        markers.push("focused".to_owned());
    }
    if scene.hovered().is_some_and(|h| h.name() == node.name()) {
        markers.push("hovered".to_owned());
    }
    for marker in markers {
        line.push(' ');
        line.push_str(&marker);
    }
    lines.push(line);
    for &child in core.children() {
        write_subtree(scene, child, depth + 1, lines);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
