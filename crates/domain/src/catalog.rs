use crate::{Category, ExerciseDefinition, ExerciseID, Name, Unit};

#[derive(Clone)]
struct CatalogExercise {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub target_muscle: &'static str,
    pub unit: Unit,
    pub icon: &'static str,
    pub aliases: &'static [&'static str],
}

impl TryFrom<&CatalogExercise> for ExerciseDefinition {
    type Error = crate::NameError;

    fn try_from(value: &CatalogExercise) -> Result<Self, Self::Error> {
        Ok(ExerciseDefinition {
            id: ExerciseID::from(value.id),
            name: Name::new(value.name)?,
            category: value.category,
            target_muscle: value.target_muscle.to_string(),
            default_weight: 0.0,
            unit: value.unit,
            icon: value.icon.to_string(),
            aliases: value.aliases.iter().map(ToString::to_string).collect(),
            is_custom: false,
        })
    }
}

/// Fixed bodyweight catalog in registration order.
#[must_use]
pub fn exercises() -> Vec<ExerciseDefinition> {
    EXERCISES
        .iter()
        .filter_map(|e| ExerciseDefinition::try_from(e).ok())
        .collect()
}

/// Known speech misrecognitions and the canonical name they stand for.
pub const CORRECTIONS: &[(&str, &str)] = &[
    ("pool ups", "pull-ups"),
    ("full ups", "pull-ups"),
    ("bull ups", "pull-ups"),
    ("bush ups", "push-ups"),
    ("dibs", "dips"),
    ("squads", "squats"),
    ("lunches", "lunges"),
    ("burpy", "burpees"),
    ("研修", "pull-ups"),
    ("献血", "pull-ups"),
    ("賢治", "pull-ups"),
    ("検証", "pull-ups"),
    ("住宅伏せ", "push-ups"),
    ("腹金", "sit-ups"),
    ("スカート", "squats"),
    ("バービー", "burpees"),
];

const EXERCISES: [CatalogExercise; 15] = [
    CatalogExercise {
        id: "push_up",
        name: "push-ups",
        category: Category::UpperBody,
        target_muscle: "chest, arms",
        unit: Unit::Count,
        icon: "💪",
        aliases: &[
            "push-ups",
            "push-up",
            "push ups",
            "push up",
            "pushups",
            "pushup",
            "press-ups",
            "press ups",
            "bush ups",
            "腕立て伏せ",
            "腕立て",
            "プッシュアップ",
            "住宅伏せ",
        ],
    },
    CatalogExercise {
        id: "pull_up",
        name: "pull-ups",
        category: Category::UpperBody,
        target_muscle: "back, arms",
        unit: Unit::Count,
        icon: "🏋️",
        aliases: &[
            "pull-ups",
            "pull-up",
            "pull ups",
            "pull up",
            "pullups",
            "pullup",
            "chin-ups",
            "chin ups",
            "pool ups",
            "full ups",
            "bull ups",
            "懸垂",
            "けんすい",
            "研修",
            "献血",
            "賢治",
            "検証",
        ],
    },
    CatalogExercise {
        id: "dips",
        name: "dips",
        category: Category::UpperBody,
        target_muscle: "chest, arms",
        unit: Unit::Count,
        icon: "💺",
        aliases: &["dips", "dip", "dibs", "ディップス", "ディップ"],
    },
    CatalogExercise {
        id: "sit_up",
        name: "sit-ups",
        category: Category::Core,
        target_muscle: "abs",
        unit: Unit::Count,
        icon: "🤸",
        aliases: &[
            "sit-ups",
            "sit-up",
            "sit ups",
            "sit up",
            "situps",
            "situp",
            "crunches",
            "crunch",
            "腹筋",
            "腹金",
            "ふっきん",
            "シットアップ",
            "クランチ",
        ],
    },
    CatalogExercise {
        id: "plank",
        name: "plank",
        category: Category::Core,
        target_muscle: "whole core",
        unit: Unit::Seconds,
        icon: "⏱️",
        aliases: &["plank", "planks", "プランク", "プラン"],
    },
    CatalogExercise {
        id: "leg_raise",
        name: "leg raises",
        category: Category::Core,
        target_muscle: "lower abs",
        unit: Unit::Count,
        icon: "🦵",
        aliases: &[
            "leg raises",
            "leg raise",
            "leg lifts",
            "leg lift",
            "レッグレイズ",
            "足上げ",
        ],
    },
    CatalogExercise {
        id: "squat",
        name: "squats",
        category: Category::LowerBody,
        target_muscle: "thighs, glutes",
        unit: Unit::Count,
        icon: "🏃",
        aliases: &["squats", "squat", "squads", "スクワット", "スカート", "スクワ"],
    },
    CatalogExercise {
        id: "lunge",
        name: "lunges",
        category: Category::LowerBody,
        target_muscle: "thighs, glutes",
        unit: Unit::Count,
        icon: "🚶",
        aliases: &["lunges", "lunge", "lunches", "ランジ"],
    },
    CatalogExercise {
        id: "calf_raise",
        name: "calf raises",
        category: Category::LowerBody,
        target_muscle: "calves",
        unit: Unit::Count,
        icon: "🦵",
        aliases: &[
            "calf raises",
            "calf raise",
            "calve raises",
            "heel raises",
            "カーフレイズ",
            "つま先立ち",
        ],
    },
    CatalogExercise {
        id: "burpee",
        name: "burpees",
        category: Category::FullBody,
        target_muscle: "full body",
        unit: Unit::Count,
        icon: "🤸‍♂️",
        aliases: &["burpees", "burpee", "burpy", "バーピー", "バービー"],
    },
    CatalogExercise {
        id: "mountain_climber",
        name: "mountain climbers",
        category: Category::FullBody,
        target_muscle: "full body, cardio",
        unit: Unit::Count,
        icon: "⛰️",
        aliases: &[
            "mountain climbers",
            "mountain climber",
            "climbers",
            "マウンテンクライマー",
            "登山",
        ],
    },
    CatalogExercise {
        id: "jumping_squat",
        name: "jump squats",
        category: Category::FullBody,
        target_muscle: "legs, cardio",
        unit: Unit::Count,
        icon: "🦘",
        aliases: &[
            "jump squats",
            "jump squat",
            "jumping squats",
            "jumping squat",
            "squat jumps",
            "ジャンピングスクワット",
            "ジャンプスクワット",
        ],
    },
    CatalogExercise {
        id: "stretch",
        name: "stretching",
        category: Category::Other,
        target_muscle: "full body",
        unit: Unit::Minutes,
        icon: "🧘",
        aliases: &[
            "stretching",
            "stretch",
            "stretches",
            "ストレッチ",
            "柔軟",
            "じゅうなん",
        ],
    },
    CatalogExercise {
        id: "walking",
        name: "walking",
        category: Category::Cardio,
        target_muscle: "legs, heart and lungs",
        unit: Unit::Minutes,
        icon: "🚶‍♂️",
        aliases: &["walking", "walk", "ウォーキング", "散歩", "歩く"],
    },
    CatalogExercise {
        id: "running",
        name: "running",
        category: Category::Cardio,
        target_muscle: "full body, heart and lungs",
        unit: Unit::Minutes,
        icon: "🏃‍♂️",
        aliases: &[
            "running", "run", "jogging", "jog", "ランニング", "ジョギング", "走る",
        ],
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_exercises() {
        let exercises = exercises();

        assert_eq!(exercises.len(), EXERCISES.len());

        for exercise in &exercises {
            assert!(!exercise.is_custom);
            assert!(exercise.is_bodyweight());
            assert!(
                exercise.aliases.contains(&exercise.name.to_string()),
                "canonical name missing from aliases of \"{}\"",
                exercise.name
            );
        }
    }

    #[test]
    fn test_exercises_duplicate_ids() {
        let mut ids = HashSet::new();

        for exercise in &EXERCISES {
            assert!(ids.insert(exercise.id), "duplicate id {}", exercise.id);
        }
    }

    #[test]
    fn test_exercises_duplicate_aliases() {
        let mut aliases = HashSet::new();

        for exercise in &EXERCISES {
            for alias in exercise.aliases {
                assert!(
                    aliases.insert(alias.to_lowercase()),
                    "duplicate alias {alias}"
                );
            }
        }
    }

    #[test]
    fn test_exercises_alias_is_not_other_canonical_name() {
        for exercise in &EXERCISES {
            for other in &EXERCISES {
                if exercise.id != other.id {
                    assert!(
                        !exercise.aliases.contains(&other.name),
                        "alias of \"{}\" shadows \"{}\"",
                        exercise.name,
                        other.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_corrections_refer_to_catalog() {
        let names = EXERCISES.iter().map(|e| e.name).collect::<HashSet<_>>();

        for (heard, name) in CORRECTIONS {
            assert!(names.contains(name), "unknown correction target {name}");
            assert!(
                EXERCISES
                    .iter()
                    .any(|e| e.name == *name && e.aliases.contains(heard)),
                "correction \"{heard}\" is not an alias of \"{name}\""
            );
        }
    }
}
