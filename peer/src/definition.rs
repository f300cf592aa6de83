use std::collections::HashMap;

use log::warn;

use verdant_shared::EntityTypeId;

/// Static, read-only configuration for one plant species. Numeric
/// parameters are copied onto an entity at claim time; the definition
/// itself is never mutated at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantDefinition {
    pub type_id: EntityTypeId,
    pub display_name: String,
    pub grow_duration_seconds: f32,
    pub max_scale: f32,
    pub scale_multiplier: f32,
    pub buy_price: i32,
    pub sell_value: i32,
}

/// Lookup of plant definitions, constructed once at session start and
/// passed by reference to everything that needs it.
#[derive(Debug, Default)]
pub struct DefinitionSet {
    definitions: HashMap<EntityTypeId, PlantDefinition>,
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    pub fn insert(&mut self, definition: PlantDefinition) {
        if self
            .definitions
            .insert(definition.type_id.clone(), definition)
            .is_some()
        {
            warn!("a plant definition was replaced; type ids should be unique");
        }
    }

    pub fn get(&self, type_id: &EntityTypeId) -> Option<&PlantDefinition> {
        self.definitions.get(type_id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
