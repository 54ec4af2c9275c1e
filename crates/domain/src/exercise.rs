use std::slice::Iter;

use derive_more::{Deref, Display};
use strum::EnumString;
use uuid::Uuid;

use crate::{CreateError, DeleteError, Name, ReadError};

#[allow(async_fn_in_trait)]
pub trait CustomExerciseRepository {
    async fn read_custom_exercises(&self) -> Result<Vec<ExerciseDefinition>, ReadError>;
    async fn create_custom_exercise(
        &self,
        exercise: ExerciseDefinition,
    ) -> Result<ExerciseDefinition, CreateError>;
    async fn delete_custom_exercise(&self, id: &ExerciseID) -> Result<ExerciseID, DeleteError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDefinition {
    pub id: ExerciseID,
    pub name: Name,
    pub category: Category,
    pub target_muscle: String,
    pub default_weight: f32,
    pub unit: Unit,
    pub icon: String,
    /// Alternate spellings, including likely speech misrecognitions. Always
    /// contains the canonical name itself.
    pub aliases: Vec<String>,
    pub is_custom: bool,
}

impl ExerciseDefinition {
    /// Definition of a user-added exercise with the given classification.
    #[must_use]
    pub fn custom(
        id: ExerciseID,
        name: Name,
        category: Category,
        target_muscle: &str,
        unit: Unit,
        icon: &str,
    ) -> Self {
        let aliases = vec![name.to_string()];
        Self {
            id,
            name,
            category,
            target_muscle: target_muscle.to_string(),
            default_weight: 0.0,
            unit,
            icon: icon.to_string(),
            aliases,
            is_custom: true,
        }
    }

    #[must_use]
    pub fn is_bodyweight(&self) -> bool {
        self.default_weight == 0.0
    }
}

#[derive(Deref, Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExerciseID(String);

impl ExerciseID {
    #[must_use]
    pub fn custom(uuid: Uuid) -> Self {
        Self(format!("custom-{uuid}"))
    }
}

impl From<&str> for ExerciseID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExerciseID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    #[strum(serialize = "upper-body", serialize = "upper body", serialize = "upper")]
    UpperBody,
    #[strum(serialize = "core", serialize = "abs")]
    Core,
    #[strum(serialize = "lower-body", serialize = "lower body", serialize = "lower")]
    LowerBody,
    #[strum(serialize = "full-body", serialize = "full body", serialize = "whole body")]
    FullBody,
    #[strum(serialize = "cardio", serialize = "aerobic")]
    Cardio,
    #[strum(serialize = "other")]
    Other,
}

impl Property for Category {
    fn iter() -> Iter<'static, Category> {
        static CATEGORIES: [Category; 6] = [
            Category::UpperBody,
            Category::Core,
            Category::LowerBody,
            Category::FullBody,
            Category::Cardio,
            Category::Other,
        ];
        CATEGORIES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Category::UpperBody => "upper-body",
            Category::Core => "core",
            Category::LowerBody => "lower-body",
            Category::FullBody => "full-body",
            Category::Cardio => "cardio",
            Category::Other => "other",
        }
    }
}

impl Category {
    /// Parse a category as returned by the generation endpoint, which may use
    /// the Japanese body part labels of the original vocabulary.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "上半身" => Some(Category::UpperBody),
            "体幹" => Some(Category::Core),
            "下半身" => Some(Category::LowerBody),
            "全身" => Some(Category::FullBody),
            "有酸素" => Some(Category::Cardio),
            "その他" => Some(Category::Other),
            other => other.parse().ok(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Unit {
    #[strum(serialize = "count", serialize = "reps", serialize = "回")]
    Count,
    #[strum(serialize = "minutes", serialize = "min", serialize = "分")]
    Minutes,
    #[strum(serialize = "seconds", serialize = "sec", serialize = "秒")]
    Seconds,
}

impl Property for Unit {
    fn iter() -> Iter<'static, Unit> {
        static UNITS: [Unit; 3] = [Unit::Count, Unit::Minutes, Unit::Seconds];
        UNITS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Unit::Count => "count",
            Unit::Minutes => "minutes",
            Unit::Seconds => "seconds",
        }
    }
}

pub trait Property: Clone + Copy + Sized {
    fn iter() -> Iter<'static, Self>;
    fn name(self) -> &'static str;
}
