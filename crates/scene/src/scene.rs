use glam::Vec3;
use serde::{Deserialize, Serialize};
use sketch_common::{Color, ObjectId, Transform};
use std::collections::BTreeMap;

/// Shape of a drawable, in local units before the transform's scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    /// Axis-aligned box centered on the local origin.
    Box { width: f32, height: f32, depth: f32 },
}

impl Geometry {
    pub fn cube(size: f32) -> Self {
        Self::Box {
            width: size,
            height: size,
            depth: size,
        }
    }

    /// Full extents along each local axis.
    pub fn extents(&self) -> Vec3 {
        match *self {
            Self::Box {
                width,
                height,
                depth,
            } => Vec3::new(width, height, depth),
        }
    }
}

/// How a drawable's surface is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Material {
    /// Surface normal mapped to RGB.
    #[default]
    Normal,
    /// Flat color with simple directional lighting.
    Solid(Color),
}

/// A drawable object held by the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub transform: Transform,
    pub geometry: Geometry,
    pub material: Material,
    pub visible: bool,
}

impl Drawable {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            transform: Transform::default(),
            geometry,
            material,
            visible: true,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

/// Mutable set of drawables.
///
/// Membership is a set keyed by `ObjectId`. Iteration order is the id order
/// (stable across runs with the same ids), never insertion order; renderers
/// must not depend on it.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: BTreeMap<ObjectId, Drawable>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drawable and return its new id.
    pub fn add(&mut self, drawable: Drawable) -> ObjectId {
        let id = ObjectId::new();
        self.add_with_id(id, drawable);
        id
    }

    /// Add a drawable under a caller-chosen id, replacing any existing entry.
    /// Returns the replaced drawable.
    pub fn add_with_id(&mut self, id: ObjectId, drawable: Drawable) -> Option<Drawable> {
        tracing::trace!(id = %id.short(), "scene add");
        self.objects.insert(id, drawable)
    }

    /// Remove a drawable. Returns it if it was present.
    pub fn remove(&mut self, id: ObjectId) -> Option<Drawable> {
        let removed = self.objects.remove(&id);
        if removed.is_some() {
            tracing::trace!(id = %id.short(), "scene remove");
        }
        removed
    }

    pub fn get(&self, id: ObjectId) -> Option<&Drawable> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Drawable> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Drawable)> {
        self.objects.iter().map(|(id, d)| (*id, d))
    }

    /// Drawables that should be rendered this frame.
    pub fn visible(&self) -> impl Iterator<Item = (ObjectId, &Drawable)> {
        self.iter().filter(|(_, d)| d.visible)
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Drawable {
        Drawable::new(Geometry::cube(25.0), Material::Normal)
    }

    #[test]
    fn scene_starts_empty() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.len(), 0);
    }

    #[test]
    fn add_and_remove() {
        let mut scene = Scene::new();
        let id = scene.add(cube());
        assert_eq!(scene.len(), 1);
        assert!(scene.contains(id));

        let removed = scene.remove(id);
        assert!(removed.is_some());
        assert!(scene.is_empty());
        assert!(scene.remove(id).is_none());
    }

    #[test]
    fn add_with_id_replaces() {
        let mut scene = Scene::new();
        let id = ObjectId::new();
        assert!(scene.add_with_id(id, cube()).is_none());
        let solid = Drawable::new(Geometry::cube(1.0), Material::Solid(Color(0xff0000)));
        let old = scene.add_with_id(id, solid).unwrap();
        assert_eq!(old.material, Material::Normal);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(id).unwrap().material, Material::Solid(Color(0xff0000)));
    }

    #[test]
    fn get_mut_updates_transform() {
        let mut scene = Scene::new();
        let id = scene.add(cube());
        scene
            .get_mut(id)
            .unwrap()
            .transform
            .set_euler(1.0, 0.5, 0.25);
        assert_ne!(
            scene.get(id).unwrap().transform.rotation,
            glam::Quat::IDENTITY
        );
    }

    #[test]
    fn visible_skips_hidden() {
        let mut scene = Scene::new();
        let shown = scene.add(cube());
        let hidden = scene.add(cube());
        scene.get_mut(hidden).unwrap().visible = false;

        let ids: Vec<ObjectId> = scene.visible().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![shown]);
        assert_eq!(scene.iter().count(), 2);
    }

    #[test]
    fn iteration_is_independent_of_insertion_order() {
        let ids: Vec<ObjectId> = (0..16).map(|_| ObjectId::new()).collect();

        let mut forward = Scene::new();
        for id in &ids {
            forward.add_with_id(*id, cube());
        }
        let mut backward = Scene::new();
        for id in ids.iter().rev() {
            backward.add_with_id(*id, cube());
        }

        let a: Vec<ObjectId> = forward.iter().map(|(id, _)| id).collect();
        let b: Vec<ObjectId> = backward.iter().map(|(id, _)| id).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn geometry_extents() {
        let g = Geometry::Box {
            width: 1.0,
            height: 2.0,
            depth: 3.0,
        };
        assert_eq!(g.extents(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(Geometry::cube(25.0).extents(), Vec3::splat(25.0));
    }
}
