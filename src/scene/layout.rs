//! Anchor-resolved geometry.
//!
//! A node stores one offset per edge, measured from the reference point that
//! edge's anchor picks on the parent's world bounds; width and height are
//! stored as-is. On each axis the edge anchored further toward the parent's
//! far side places the node (ties go to left/top), so a node whose right edge
//! is anchored to the parent's right follows it when the parent widens.
//! World bounds are resolved through the parent chain on every read.
//! Parentless nodes resolve against an empty region at the origin.

use super::Scene;
use crate::dom::anchor::{AnchorPoint, Edge};
use crate::dom::handle::NodeRef;
use crate::dom::node::{Geometry, NodeId};
use crate::error::Result;
use crate::event::record::Event;
use crate::event::types::EventType;
use crate::geometry::Region;

impl Scene {
    /// World bounds of `node`.
    pub fn bounds(&self, node: impl Into<NodeRef>) -> Option<Region> {
        self.id(node).map(|id| self.world_bounds(id))
    }

    /// Stored geometry of `node`: offsets, size and anchors.
    pub fn geometry(&self, node: impl Into<NodeRef>) -> Option<Geometry> {
        self.core(node).map(|c| c.geometry)
    }

    pub(crate) fn world_bounds(&self, id: NodeId) -> Region {
        let Some(node) = self.store.get(id) else {
            return Region::EMPTY;
        };
        let parent = node
            .core
            .parent
            .map(|p| self.world_bounds(p))
            .unwrap_or(Region::EMPTY);
        resolve(&node.core.geometry, parent)
    }

    fn parent_bounds(&self, id: NodeId) -> Region {
        self.store
            .parent(id)
            .map(|p| self.world_bounds(p))
            .unwrap_or(Region::EMPTY)
    }

    // ── Getters ──────────────────────────────────────────────────────

    /// World x of the left edge.
    pub fn get_x(&self, node: impl Into<NodeRef>) -> Option<f32> {
        self.bounds(node).map(Region::left)
    }

    /// World y of the top edge.
    pub fn get_y(&self, node: impl Into<NodeRef>) -> Option<f32> {
        self.bounds(node).map(Region::top)
    }

    pub fn get_width(&self, node: impl Into<NodeRef>) -> Option<f32> {
        self.core(node).map(|c| c.geometry.width)
    }

    pub fn get_height(&self, node: impl Into<NodeRef>) -> Option<f32> {
        self.core(node).map(|c| c.geometry.height)
    }

    pub fn get_left(&self, node: impl Into<NodeRef>) -> Option<f32> {
        self.bounds(node).map(Region::left)
    }

    pub fn get_right(&self, node: impl Into<NodeRef>) -> Option<f32> {
        self.bounds(node).map(Region::right)
    }

    pub fn get_top(&self, node: impl Into<NodeRef>) -> Option<f32> {
        self.bounds(node).map(Region::top)
    }

    pub fn get_bottom(&self, node: impl Into<NodeRef>) -> Option<f32> {
        self.bounds(node).map(Region::bottom)
    }

    // ── Setters ──────────────────────────────────────────────────────

    /// Move `node` so its world left edge is at `x`. Size is unchanged.
    pub fn set_x(&mut self, node: impl Into<NodeRef>, x: f32) -> bool {
        let Some(id) = self.id(node) else { return false };
        let y = self.world_bounds(id).y;
        self.place(id, x, y, None)
    }

    /// Move `node` so its world top edge is at `y`. Size is unchanged.
    pub fn set_y(&mut self, node: impl Into<NodeRef>, y: f32) -> bool {
        let Some(id) = self.id(node) else { return false };
        let x = self.world_bounds(id).x;
        self.place(id, x, y, None)
    }

    /// Move `node` to world position `(x, y)`.
    pub fn set_position(&mut self, node: impl Into<NodeRef>, x: f32, y: f32) -> bool {
        match self.id(node) {
            Some(id) => self.place(id, x, y, None),
            None => false,
        }
    }

    /// Resize `node`, keeping its left and top edges.
    pub fn set_size(&mut self, node: impl Into<NodeRef>, width: f32, height: f32) -> bool {
        let Some(id) = self.id(node) else { return false };
        let b = self.world_bounds(id);
        self.place(id, b.x, b.y, Some((width, height)))
    }

    pub fn set_width(&mut self, node: impl Into<NodeRef>, width: f32) -> bool {
        let Some(id) = self.id(node) else { return false };
        let b = self.world_bounds(id);
        self.place(id, b.x, b.y, Some((width, b.height)))
    }

    pub fn set_height(&mut self, node: impl Into<NodeRef>, height: f32) -> bool {
        let Some(id) = self.id(node) else { return false };
        let b = self.world_bounds(id);
        self.place(id, b.x, b.y, Some((b.width, height)))
    }

    /// Move the left edge, keeping the right edge fixed.
    pub fn set_left(&mut self, node: impl Into<NodeRef>, left: f32) -> bool {
        let Some(id) = self.id(node) else { return false };
        let b = self.world_bounds(id);
        self.place(id, left, b.y, Some(((b.right() - left).max(0.0), b.height)))
    }

    /// Move the right edge, keeping the left edge fixed.
    pub fn set_right(&mut self, node: impl Into<NodeRef>, right: f32) -> bool {
        let Some(id) = self.id(node) else { return false };
        let b = self.world_bounds(id);
        self.place(id, b.x, b.y, Some(((right - b.x).max(0.0), b.height)))
    }

    /// Move the top edge, keeping the bottom edge fixed.
    pub fn set_top(&mut self, node: impl Into<NodeRef>, top: f32) -> bool {
        let Some(id) = self.id(node) else { return false };
        let b = self.world_bounds(id);
        self.place(id, b.x, top, Some((b.width, (b.bottom() - top).max(0.0))))
    }

    /// Move the bottom edge, keeping the top edge fixed.
    pub fn set_bottom(&mut self, node: impl Into<NodeRef>, bottom: f32) -> bool {
        let Some(id) = self.id(node) else { return false };
        let b = self.world_bounds(id);
        self.place(id, b.x, b.y, Some((b.width, (bottom - b.y).max(0.0))))
    }

    /// Set world position and optionally size, firing `Move`/`Resize` on change.
    fn place(&mut self, id: NodeId, x: f32, y: f32, size: Option<(f32, f32)>) -> bool {
        let parent = self.parent_bounds(id);
        let before = self.world_bounds(id);
        let Some(node) = self.store.get_mut(id) else {
            return false;
        };
        let g = &mut node.core.geometry;
        let (width, height) = size.unwrap_or((g.width, g.height));
        let moved = x != before.x || y != before.y;
        let resized = width != g.width || height != g.height;
        g.width = width;
        g.height = height;
        pin(g, Region::new(x, y, width, height), parent);
        if moved || resized {
            self.mark_dirty(id);
            self.notify(id, moved, resized);
        }
        true
    }

    /// Fill in unset right/bottom offsets from the node's current world
    /// bounds. Called when a node gains a parent.
    pub(crate) fn pin_far_edges(&mut self, id: NodeId) {
        let parent = self.parent_bounds(id);
        let world = self.world_bounds(id);
        let Some(node) = self.store.get_mut(id) else { return };
        let g = &mut node.core.geometry;
        let anchors = g.anchors;
        if g.right.is_none() {
            g.right = Some(world.right() - anchors.reference(Edge::Right, parent));
        }
        if g.bottom.is_none() {
            g.bottom = Some(world.bottom() - anchors.reference(Edge::Bottom, parent));
        }
    }

    fn notify(&mut self, id: NodeId, moved: bool, resized: bool) {
        let Some(handle) = self.store.handle(id) else { return };
        if moved {
            self.dispatch(Event::new(EventType::MOVE).with_target(handle.clone()));
        }
        if resized {
            self.dispatch(Event::new(EventType::RESIZE).with_target(handle));
        }
    }

    // ── Anchors ──────────────────────────────────────────────────────

    /// The anchor of `edge` on `node`.
    pub fn anchor(&self, node: impl Into<NodeRef>, edge: Edge) -> Option<AnchorPoint> {
        self.core(node).map(|c| c.geometry.anchors.get(edge))
    }

    /// Re-anchor one edge. The node keeps its world position and size; the
    /// stored offsets are recomputed against the new reference points.
    pub fn set_anchor(&mut self, node: impl Into<NodeRef>, edge: Edge, point: AnchorPoint) -> bool {
        let Some(id) = self.id(node) else { return false };
        let parent = self.parent_bounds(id);
        let world = self.world_bounds(id);
        let Some(n) = self.store.get_mut(id) else { return false };
        let g = &mut n.core.geometry;
        g.anchors.set(edge, point);
        pin(g, world, parent);
        true
    }

    /// Re-anchor one edge from a human-written anchor string such as
    /// `"top & left"` or `"Bottom-Right"`.
    pub fn set_anchor_str(&mut self, node: impl Into<NodeRef>, edge: Edge, anchor: &str) -> Result<bool> {
        let point: AnchorPoint = anchor.parse()?;
        Ok(self.set_anchor(node, edge, point))
    }

    /// Re-anchor all four edges to the same point.
    pub fn set_anchors(&mut self, node: impl Into<NodeRef>, point: AnchorPoint) -> bool {
        let node = node.into();
        [Edge::Top, Edge::Left, Edge::Bottom, Edge::Right]
            .into_iter()
            .all(|edge| self.set_anchor(node.clone(), edge, point))
    }

    /// Distance of `edge` from the reference point its anchor picks on the
    /// parent: positive is right/down.
    pub fn edge_offset(&self, node: impl Into<NodeRef>, edge: Edge) -> Option<f32> {
        let id = self.id(node)?;
        let anchors = self.store.get(id)?.core.geometry.anchors;
        let parent = self.parent_bounds(id);
        let b = self.world_bounds(id);
        let coordinate = match edge {
            Edge::Left => b.left(),
            Edge::Right => b.right(),
            Edge::Top => b.top(),
            Edge::Bottom => b.bottom(),
        };
        Some(coordinate - anchors.reference(edge, parent))
    }

    // ── Dirty tracking ───────────────────────────────────────────────

    /// Mark `id` and its descendants dirty.
    pub(crate) fn mark_dirty(&mut self, id: NodeId) {
        for node in self.store.walk_depth_first(id) {
            if let Some(n) = self.store.get_mut(node) {
                n.core.dirty = true;
            }
        }
    }

    /// Whether `node` changed since it was last rendered.
    pub fn is_dirty(&self, node: impl Into<NodeRef>) -> bool {
        self.core(node).is_some_and(|c| c.dirty)
    }

    /// Clear the dirty flag of `node` only.
    pub fn clear_dirty(&mut self, node: impl Into<NodeRef>) -> bool {
        match self.core_mut(node) {
            Some(core) => {
                core.dirty = false;
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// World bounds of `g` under `parent`.
fn resolve(g: &Geometry, parent: Region) -> Region {
    let a = g.anchors;
    let x = match g.right {
        Some(right) if a.right.horizontal() > a.left.horizontal() => {
            a.reference(Edge::Right, parent) + right - g.width
        }
        _ => a.reference(Edge::Left, parent) + g.left,
    };
    let y = match g.bottom {
        Some(bottom) if a.bottom.vertical() > a.top.vertical() => {
            a.reference(Edge::Bottom, parent) + bottom - g.height
        }
        _ => a.reference(Edge::Top, parent) + g.top,
    };
    Region::new(x, y, g.width, g.height)
}

/// Re-derive every edge offset so `g` resolves to `world` under `parent`.
fn pin(g: &mut Geometry, world: Region, parent: Region) {
    let a = g.anchors;
    g.left = world.left() - a.reference(Edge::Left, parent);
    g.top = world.top() - a.reference(Edge::Top, parent);
    g.right = Some(world.right() - a.reference(Edge::Right, parent));
    g.bottom = Some(world.bottom() - a.reference(Edge::Bottom, parent));
}
