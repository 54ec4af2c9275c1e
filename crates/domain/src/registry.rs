use log::debug;

use crate::{ExerciseDefinition, ExerciseID, Name, RegistryError, catalog};

/// Canonical exercise vocabulary: the fixed catalog followed by custom
/// exercises in registration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    definitions: Vec<ExerciseDefinition>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            definitions: catalog::exercises(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            definitions: vec![],
        }
    }

    #[must_use]
    pub fn all_definitions(&self) -> &[ExerciseDefinition] {
        &self.definitions
    }

    pub fn canonical_names(&self) -> impl Iterator<Item = &Name> {
        self.definitions.iter().map(|d| &d.name)
    }

    #[must_use]
    pub fn find_by_exact_name(&self, name: &str) -> Option<&ExerciseDefinition> {
        self.definitions.iter().find(|d| d.name.matches(name))
    }

    #[must_use]
    pub fn find_by_id(&self, id: &ExerciseID) -> Option<&ExerciseDefinition> {
        self.definitions.iter().find(|d| d.id == *id)
    }

    /// Find the first definition whose aliases match the token.
    ///
    /// An alias equal to the token wins over containment. Otherwise the first
    /// definition in catalog order with an alias that contains the token, or
    /// is contained in it, is returned.
    #[must_use]
    pub fn find_by_alias(&self, token: &str) -> Option<&ExerciseDefinition> {
        let token = token.trim().to_lowercase();

        if token.is_empty() {
            return None;
        }

        self.definitions
            .iter()
            .find(|d| d.aliases.iter().any(|a| a.to_lowercase() == token))
            .or_else(|| {
                self.definitions.iter().find(|d| {
                    d.aliases.iter().any(|a| {
                        let alias = a.to_lowercase();
                        alias.contains(&token) || token.contains(&alias)
                    })
                })
            })
    }

    pub fn register(&mut self, definition: ExerciseDefinition) -> Result<(), RegistryError> {
        if self.find_by_exact_name(definition.name.as_str()).is_some() {
            return Err(RegistryError::Conflict(definition.name.to_string()));
        }
        debug!("registered exercise \"{}\"", definition.name);
        self.definitions.push(definition);
        Ok(())
    }

    /// Remove a custom exercise. Fixed catalog entries and unknown ids are
    /// left untouched.
    pub fn remove_custom(&mut self, id: &ExerciseID) -> Option<ExerciseDefinition> {
        let index = self
            .definitions
            .iter()
            .position(|d| d.is_custom && d.id == *id)?;
        Some(self.definitions.remove(index))
    }

    pub fn custom_definitions(&self) -> impl Iterator<Item = &ExerciseDefinition> {
        self.definitions.iter().filter(|d| d.is_custom)
    }
}
