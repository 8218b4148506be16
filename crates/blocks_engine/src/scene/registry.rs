//! Object registry
//!
//! Owns every object record in a scene. Objects are stored densely in creation
//! order, so an [`ObjectId`] is also the record's slot. Nothing is ever
//! removed, which keeps identifiers stable for the whole session.

use super::object::{ObjectId, ObjectKind, ObjectTemplate, SceneObject, Support};
use super::tags::{Tag, TagValue};
use crate::error::SceneError;
use crate::foundation::math::Point3;

/// Registry containing all objects of a scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectRegistry {
    objects: Vec<SceneObject>,
}

impl ObjectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new object
    ///
    /// Setup-time only: the runtime action surface never creates objects.
    pub(crate) fn create(&mut self, template: ObjectTemplate, position: Point3, resting_on: Option<Support>) -> ObjectId {
        let id = ObjectId::from(self.objects.len() as u32);
        log::trace!("Registering {} {} at {:?}", template.kind, id, position);
        self.objects.push(SceneObject::new(id, template, position, resting_on));
        id
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the registry holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether `id` names an object
    pub fn contains(&self, id: ObjectId) -> bool {
        (id.index() as usize) < self.objects.len()
    }

    /// Get an object by ID
    pub fn get(&self, id: ObjectId) -> Result<&SceneObject, SceneError> {
        self.objects
            .get(id.index() as usize)
            .ok_or(SceneError::UnknownObject(id))
    }

    pub(crate) fn get_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject, SceneError> {
        self.objects
            .get_mut(id.index() as usize)
            .ok_or(SceneError::UnknownObject(id))
    }

    /// Get an object and check that it is of the expected kind
    pub fn get_kind(&self, id: ObjectId, expected: ObjectKind) -> Result<&SceneObject, SceneError> {
        let object = self.get(id)?;
        if object.kind() != expected {
            return Err(SceneError::WrongKind {
                id,
                expected,
                found: object.kind(),
            });
        }
        Ok(object)
    }

    /// Position of an object
    pub fn position(&self, id: ObjectId) -> Result<Point3, SceneError> {
        self.get(id).map(SceneObject::position)
    }

    /// Look up a tag on an object
    pub fn get_tag(&self, id: ObjectId, tag: Tag) -> Result<TagValue, SceneError> {
        self.get(id)?.tag(tag).ok_or_else(|| SceneError::UnknownTag {
            tag: tag.name().to_string(),
            object: Some(id),
        })
    }

    /// Iterate over the tags an object carries
    ///
    /// The iterator is lazy and finite; clone it (or call again) to restart.
    pub fn iter_tags(&self, id: ObjectId) -> Result<TagIter<'_>, SceneError> {
        Ok(TagIter {
            object: self.get(id)?,
            next: 0,
        })
    }

    /// Iterate over all objects in creation order
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> + '_ {
        self.objects.iter()
    }

    /// Iterate over the IDs of objects matching a predicate
    pub fn find<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = ObjectId> + 'a
    where
        P: Fn(&SceneObject) -> bool + 'a,
    {
        self.objects
            .iter()
            .filter(move |object| predicate(object))
            .map(SceneObject::id)
    }

    /// Iterate over the IDs of objects whose tags equal every filter value
    ///
    /// An object that lacks a filtered tag does not match. No filters match
    /// every object.
    pub fn find_by_tags<'a>(&'a self, filters: &'a [(Tag, TagValue)]) -> impl Iterator<Item = ObjectId> + 'a {
        self.find(move |object| {
            filters
                .iter()
                .all(|(tag, value)| object.tag(*tag).as_ref() == Some(value))
        })
    }

    /// Iterate over all graspers
    pub fn graspers(&self) -> impl Iterator<Item = &SceneObject> + '_ {
        self.objects.iter().filter(|object| object.is_grasper())
    }
}

/// Lazy iterator over an object's `(tag, value)` pairs
#[derive(Debug, Clone)]
pub struct TagIter<'a> {
    object: &'a SceneObject,
    next: usize,
}

impl Iterator for TagIter<'_> {
    type Item = (Tag, TagValue);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(tag) = Tag::ALL.get(self.next).copied() {
            self.next += 1;
            if let Some(value) = self.object.tag(tag) {
                return Some((tag, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(Tag::ALL.len().saturating_sub(self.next)))
    }
}
