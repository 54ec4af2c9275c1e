use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use derive_more::Deref;
use uuid::Uuid;

use crate::{CreateError, DeleteError, Name, ReadError};

#[allow(async_fn_in_trait)]
pub trait WorkoutRepository {
    /// Records ordered by timestamp, newest first.
    async fn read_workouts(&self, limit: Option<usize>) -> Result<Vec<WorkoutRecord>, ReadError>;
    async fn create_workout(&self, workout: WorkoutRecord) -> Result<WorkoutRecord, CreateError>;
    /// Deleting an id that does not exist is not an error.
    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError>;
    async fn clear_workouts(&self) -> Result<(), DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRecord {
    pub id: WorkoutID,
    pub timestamp: NaiveDateTime,
    pub raw_input: String,
    pub exercises: Vec<ExerciseEntry>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl WorkoutRecord {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    #[must_use]
    pub fn total_reps(&self) -> u32 {
        self.exercises
            .iter()
            .fold(0, |total, entry| total.saturating_add(entry.reps()))
    }

    #[must_use]
    pub fn total_sets(&self) -> u32 {
        self.exercises
            .iter()
            .fold(0, |total, entry| total.saturating_add(entry.sets()))
    }

    #[must_use]
    pub fn total_volume(&self) -> f32 {
        self.exercises.iter().map(ExerciseEntry::volume).sum()
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(Uuid);

impl WorkoutID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

impl fmt::Display for WorkoutID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One exercise inside a workout record.
///
/// Fields are only reachable through accessors so that the volume invariant
/// holds for every value: `sets >= 1`, and `volume = weight * reps * sets` for
/// a positive weight, `reps * sets` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseEntry {
    name: Name,
    weight: f32,
    weight_unit: WeightUnit,
    reps: u32,
    sets: u32,
    volume: f32,
}

impl ExerciseEntry {
    /// A missing or zero set count is stored as one set. Negative or
    /// non-finite weights are stored as zero.
    #[must_use]
    pub fn new(
        name: Name,
        weight: f32,
        weight_unit: WeightUnit,
        reps: u32,
        sets: Option<u32>,
    ) -> Self {
        let weight = if weight.is_finite() && weight > 0.0 {
            weight
        } else {
            0.0
        };
        let sets = sets.unwrap_or(1).max(1);
        #[allow(clippy::cast_precision_loss)]
        let volume = if weight > 0.0 {
            weight * reps as f32 * sets as f32
        } else {
            reps as f32 * sets as f32
        };
        Self {
            name,
            weight,
            weight_unit,
            reps,
            sets,
            volume,
        }
    }

    #[must_use]
    pub fn bodyweight(name: Name, reps: u32, sets: Option<u32>) -> Self {
        Self::new(name, 0.0, WeightUnit::default(), reps, sets)
    }

    /// Apply the operating mode: bodyweight mode forces the weight to zero.
    #[must_use]
    pub fn in_mode(self, mode: Mode) -> Self {
        match mode {
            Mode::Bodyweight if self.weight > 0.0 => {
                Self::new(self.name, 0.0, self.weight_unit, self.reps, Some(self.sets))
            }
            _ => self,
        }
    }

    #[must_use]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    #[must_use]
    pub fn weight_unit(&self) -> WeightUnit {
        self.weight_unit
    }

    #[must_use]
    pub fn reps(&self) -> u32 {
        self.reps
    }

    #[must_use]
    pub fn sets(&self) -> u32 {
        self.sets
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilo" | "kilos" | "kilogram" | "kilograms" | "キロ" => {
                Some(WeightUnit::Kg)
            }
            "lb" | "lbs" | "pound" | "pounds" => Some(WeightUnit::Lb),
            _ => None,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                WeightUnit::Kg => "kg",
                WeightUnit::Lb => "lb",
            }
        )
    }
}

/// Whether weights reported in an utterance are kept.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Weight is always zero and volume is reps × sets.
    #[default]
    Bodyweight,
    Weighted,
}
