//! Room template registry.
//!
//! Templates are immutable recipes registered once at startup. Lookup by id
//! is strict; lookup by sequence index wraps around the registry, and the
//! orchestrator's fallback path resolves a miss to the first template.

pub mod catalog;

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::error::RegistryError;
use crate::world::RoomBuilder;

/// Colour scheme and glyph shown for a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub color: u32,
    pub accent: u32,
    pub fog: u32,
    pub symbol: &'static str,
}

impl Theme {
    pub const fn new(color: u32, accent: u32, fog: u32, symbol: &'static str) -> Self {
        Self {
            color,
            accent,
            fog,
            symbol,
        }
    }
}

/// Geometry recipe, expressed in room-local coordinates
pub type BuildRecipe = fn(&mut RoomBuilder);

#[derive(Debug, Clone, Copy)]
pub struct RoomTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub theme: Theme,
    pub build: BuildRecipe,
}

/// Ordered set of templates with id lookup
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<RoomTemplate>,
    by_id: HashMap<&'static str, usize>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the eight built-in rooms in catalogue order
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for template in catalog::builtin() {
            // catalogue ids are unique
            let _ = registry.register(template);
        }
        registry
    }

    pub fn register(&mut self, template: RoomTemplate) -> Result<(), RegistryError> {
        if self.by_id.contains_key(template.id) {
            return Err(RegistryError::DuplicateTemplate(template.id.to_string()));
        }
        self.by_id.insert(template.id, self.templates.len());
        self.templates.push(template);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&RoomTemplate, RegistryError> {
        self.by_id
            .get(id)
            .map(|&i| &self.templates[i])
            .ok_or_else(|| RegistryError::UnknownTemplate(id.to_string()))
    }

    /// Template at `index`, wrapping around the registry length
    pub fn at(&self, index: usize) -> Result<&RoomTemplate, RegistryError> {
        if self.templates.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(&self.templates[index % self.templates.len()])
    }

    /// Resolve `id`, falling back to the first template on a miss
    pub fn get_or_first(&self, id: &str) -> Result<&RoomTemplate, RegistryError> {
        match self.get(id) {
            Ok(template) => Ok(template),
            Err(e) => {
                warn!(error = %e, "falling back to first room template");
                self.first()
            }
        }
    }

    pub fn first(&self) -> Result<&RoomTemplate, RegistryError> {
        self.templates.first().ok_or(RegistryError::Empty)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomTemplate> {
        self.templates.iter()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.templates.iter().map(|t| t.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut RoomBuilder) {}

    fn template(id: &'static str) -> RoomTemplate {
        RoomTemplate {
            id,
            name: "TEST",
            theme: Theme::new(0, 0, 0, "?"),
            build: noop,
        }
    }

    #[test]
    fn test_builtin_order() {
        let registry = TemplateRegistry::with_builtin();
        assert_eq!(
            registry.ids(),
            vec!["azure", "crimson", "emerald", "amber", "violet", "silver", "coral", "cyan"]
        );
        assert_eq!(registry.index_of("amber"), Some(3));
    }

    #[test]
    fn test_get_unknown_is_error() {
        let registry = TemplateRegistry::with_builtin();
        assert_eq!(
            registry.get("obsidian").unwrap_err(),
            RegistryError::UnknownTemplate("obsidian".into())
        );
        assert_eq!(registry.get_or_first("obsidian").unwrap().id, "azure");
    }

    #[test]
    fn test_at_wraps() {
        let registry = TemplateRegistry::with_builtin();
        assert_eq!(registry.at(8).unwrap().id, "azure");
        assert_eq!(registry.at(10).unwrap().id, "emerald");
    }

    #[test]
    fn test_empty_registry() {
        let registry = TemplateRegistry::new();
        assert_eq!(registry.at(0).unwrap_err(), RegistryError::Empty);
        assert_eq!(registry.get_or_first("azure").unwrap_err(), RegistryError::Empty);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = TemplateRegistry::new();
        registry.register(template("a")).unwrap();
        assert_eq!(
            registry.register(template("a")).unwrap_err(),
            RegistryError::DuplicateTemplate("a".into())
        );
        assert_eq!(registry.len(), 1);
    }
}
