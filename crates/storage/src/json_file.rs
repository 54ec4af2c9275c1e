#![allow(clippy::missing_errors_doc)]

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use log::debug;
use repvoice_domain::{self as domain, Property};
use strum::AsRefStr;
use uuid::Uuid;

use crate::newest_first;

/// Stores every collection as a JSON array in its own file below `directory`.
#[derive(Debug, Clone)]
pub struct JsonFile {
    directory: PathBuf,
}

impl JsonFile {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path(&self, store: Store) -> PathBuf {
        self.directory.join(format!("{}.json", store.as_ref()))
    }

    fn read<T>(&self, store: Store) -> Result<Vec<T>, domain::StorageError>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let path = self.path(store);
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|err| {
                domain::StorageError::Other(
                    format!("invalid content in {}: {err}", path.display()).into(),
                )
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet", path.display());
                Ok(vec![])
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Replace the content of `store`. The file is written next to the target
    /// and renamed, so a failed write leaves the previous content intact.
    fn write<T: serde::Serialize>(
        &self,
        store: Store,
        values: &[T],
    ) -> Result<(), domain::StorageError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.path(store);
        let temporary_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(values)
            .map_err(|err| domain::StorageError::Other(Box::new(err)))?;
        fs::write(&temporary_path, content)?;
        fs::rename(&temporary_path, &path)?;
        Ok(())
    }
}

impl domain::WorkoutRepository for JsonFile {
    async fn read_workouts(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<domain::WorkoutRecord>, domain::ReadError> {
        let workouts = self
            .read::<Workout>(Store::Workouts)?
            .into_iter()
            .map(|w| {
                domain::WorkoutRecord::try_from(w)
                    .map_err(|err| domain::ReadError::Other(Box::new(err)))
            })
            .collect::<Result<Vec<_>, domain::ReadError>>()?;
        Ok(newest_first(workouts, limit))
    }

    async fn create_workout(
        &self,
        workout: domain::WorkoutRecord,
    ) -> Result<domain::WorkoutRecord, domain::CreateError> {
        let mut workouts = self.read::<Workout>(Store::Workouts)?;
        if workouts.iter().any(|w| w.id == *workout.id) {
            return Err(domain::CreateError::Conflict);
        }
        workouts.push(Workout::from(&workout));
        self.write(Store::Workouts, &workouts)?;
        Ok(workout)
    }

    async fn delete_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        let mut workouts = self.read::<Workout>(Store::Workouts)?;
        let len = workouts.len();
        workouts.retain(|w| w.id != *id);
        if workouts.len() != len {
            self.write(Store::Workouts, &workouts)?;
        }
        Ok(id)
    }

    async fn clear_workouts(&self) -> Result<(), domain::DeleteError> {
        self.write::<Workout>(Store::Workouts, &[])?;
        Ok(())
    }
}

impl domain::CustomExerciseRepository for JsonFile {
    async fn read_custom_exercises(
        &self,
    ) -> Result<Vec<domain::ExerciseDefinition>, domain::ReadError> {
        self.read::<ExerciseDefinition>(Store::CustomExercises)?
            .into_iter()
            .map(|e| {
                domain::ExerciseDefinition::try_from(e)
                    .map_err(|err| domain::ReadError::Other(Box::new(err)))
            })
            .collect()
    }

    async fn create_custom_exercise(
        &self,
        exercise: domain::ExerciseDefinition,
    ) -> Result<domain::ExerciseDefinition, domain::CreateError> {
        let mut exercises = self.read::<ExerciseDefinition>(Store::CustomExercises)?;
        if exercises.iter().any(|e| e.id == *exercise.id) {
            return Err(domain::CreateError::Conflict);
        }
        exercises.push(ExerciseDefinition::from(&exercise));
        self.write(Store::CustomExercises, &exercises)?;
        Ok(exercise)
    }

    async fn delete_custom_exercise(
        &self,
        id: &domain::ExerciseID,
    ) -> Result<domain::ExerciseID, domain::DeleteError> {
        let mut exercises = self.read::<ExerciseDefinition>(Store::CustomExercises)?;
        exercises.retain(|e| e.id != **id);
        self.write(Store::CustomExercises, &exercises)?;
        Ok(id.clone())
    }
}

#[derive(AsRefStr, Clone, Copy)]
enum Store {
    #[strum(serialize = "workouts")]
    Workouts,
    #[strum(serialize = "custom_exercises")]
    CustomExercises,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EntryError {
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
    #[error("invalid category: {0}")]
    InvalidCategory(String),
    #[error("invalid unit: {0}")]
    InvalidUnit(String),
    #[error("invalid weight unit: {0}")]
    InvalidWeightUnit(String),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub timestamp: NaiveDateTime,
    pub raw_input: String,
    pub exercises: Vec<ExerciseEntry>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&domain::WorkoutRecord> for Workout {
    fn from(value: &domain::WorkoutRecord) -> Self {
        Self {
            id: *value.id,
            timestamp: value.timestamp,
            raw_input: value.raw_input.clone(),
            exercises: value.exercises.iter().map(ExerciseEntry::from).collect(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl TryFrom<Workout> for domain::WorkoutRecord {
    type Error = EntryError;

    fn try_from(value: Workout) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            timestamp: value.timestamp,
            raw_input: value.raw_input,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::ExerciseEntry::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

/// Volume is stored for readers of the file but recomputed on load.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ExerciseEntry {
    pub name: String,
    pub weight: f32,
    pub weight_unit: String,
    pub reps: u32,
    pub sets: u32,
    pub volume: f32,
}

impl From<&domain::ExerciseEntry> for ExerciseEntry {
    fn from(value: &domain::ExerciseEntry) -> Self {
        Self {
            name: value.name().to_string(),
            weight: value.weight(),
            weight_unit: value.weight_unit().to_string(),
            reps: value.reps(),
            sets: value.sets(),
            volume: value.volume(),
        }
    }
}

impl TryFrom<ExerciseEntry> for domain::ExerciseEntry {
    type Error = EntryError;

    fn try_from(value: ExerciseEntry) -> Result<Self, Self::Error> {
        Ok(Self::new(
            domain::Name::new(&value.name)?,
            value.weight,
            domain::WeightUnit::parse(&value.weight_unit)
                .ok_or(EntryError::InvalidWeightUnit(value.weight_unit))?,
            value.reps,
            Some(value.sets),
        ))
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ExerciseDefinition {
    pub id: String,
    pub name: String,
    pub category: String,
    pub target_muscle: String,
    pub default_weight: f32,
    pub unit: String,
    pub icon: String,
    pub aliases: Vec<String>,
    pub is_custom: bool,
}

impl From<&domain::ExerciseDefinition> for ExerciseDefinition {
    fn from(value: &domain::ExerciseDefinition) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.to_string(),
            category: value.category.name().to_string(),
            target_muscle: value.target_muscle.clone(),
            default_weight: value.default_weight,
            unit: value.unit.name().to_string(),
            icon: value.icon.clone(),
            aliases: value.aliases.clone(),
            is_custom: value.is_custom,
        }
    }
}

impl TryFrom<ExerciseDefinition> for domain::ExerciseDefinition {
    type Error = EntryError;

    fn try_from(value: ExerciseDefinition) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            category: domain::Category::parse(&value.category)
                .ok_or(EntryError::InvalidCategory(value.category))?,
            target_muscle: value.target_muscle,
            default_weight: value.default_weight,
            unit: value
                .unit
                .parse()
                .map_err(|_| EntryError::InvalidUnit(value.unit))?,
            icon: value.icon,
            aliases: value.aliases,
            is_custom: value.is_custom,
        })
    }
}
