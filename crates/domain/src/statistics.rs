use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::{Category, Name, Property, Registry, WorkoutRecord};

/// Minimum total repetitions for levels 1 to 7.
pub const LEVEL_THRESHOLDS: [u32; 7] = [0, 100, 300, 600, 1000, 1500, 2500];

const LEVEL_NAMES: [&str; 7] = [
    "Beginner",
    "Apprentice",
    "Intermediate",
    "Advanced",
    "Expert",
    "Master",
    "Legend",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub level: u8,
    pub name: &'static str,
    pub next_threshold: Option<u32>,
}

impl Level {
    #[must_use]
    pub fn from_total_reps(total_reps: u32) -> Self {
        let index = LEVEL_THRESHOLDS
            .iter()
            .rposition(|threshold| total_reps >= *threshold)
            .unwrap_or(0);
        #[allow(clippy::cast_possible_truncation)]
        let level = index as u8 + 1;
        Self {
            level,
            name: LEVEL_NAMES[index],
            next_threshold: LEVEL_THRESHOLDS.get(index + 1).copied(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPartStats {
    pub total_reps: u32,
    pub level: Level,
}

/// Total repetitions and level per category. Every category is present.
/// Exercises that are not in the registry are not counted.
#[must_use]
pub fn body_part_stats(
    records: &[WorkoutRecord],
    registry: &Registry,
) -> BTreeMap<Category, BodyPartStats> {
    let mut totals = Category::iter()
        .map(|category| (*category, 0))
        .collect::<BTreeMap<Category, u32>>();

    for entry in records.iter().flat_map(|r| &r.exercises) {
        if let Some(definition) = registry.find_by_exact_name(entry.name().as_str()) {
            let total = totals.entry(definition.category).or_default();
            *total = total.saturating_add(entry.reps());
        }
    }

    totals
        .into_iter()
        .map(|(category, total_reps)| {
            (
                category,
                BodyPartStats {
                    total_reps,
                    level: Level::from_total_reps(total_reps),
                },
            )
        })
        .collect()
}

/// Number of consecutive days with at least one record, ending today.
#[must_use]
pub fn streak(records: &[WorkoutRecord], today: NaiveDate) -> u32 {
    let dates = records
        .iter()
        .map(WorkoutRecord::date)
        .collect::<BTreeSet<_>>();
    let mut streak = 0;
    let mut day = today;

    while dates.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }

    streak
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseTotal {
    pub name: Name,
    pub total_reps: u32,
    pub sessions: u32,
}

/// Exercises with the most repetitions, at most `n`. Ties keep the order of
/// first appearance.
#[must_use]
pub fn top_exercises(records: &[WorkoutRecord], n: usize) -> Vec<ExerciseTotal> {
    let mut totals: Vec<ExerciseTotal> = vec![];
    let mut index = HashMap::new();

    for entry in records.iter().flat_map(|r| &r.exercises) {
        let i = *index.entry(entry.name().clone()).or_insert_with(|| {
            totals.push(ExerciseTotal {
                name: entry.name().clone(),
                total_reps: 0,
                sessions: 0,
            });
            totals.len() - 1
        });
        totals[i].total_reps = totals[i].total_reps.saturating_add(entry.reps());
        totals[i].sessions += 1;
    }

    totals.sort_by(|a, b| b.total_reps.cmp(&a.total_reps));
    totals.truncate(n);
    totals
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyTotal {
    pub exercises: u32,
    pub reps: u32,
    pub sets: u32,
    pub volume: f32,
}

#[must_use]
pub fn daily_totals(records: &[WorkoutRecord]) -> BTreeMap<NaiveDate, DailyTotal> {
    let mut result = BTreeMap::<NaiveDate, DailyTotal>::new();

    for record in records {
        let total = result.entry(record.date()).or_default();
        #[allow(clippy::cast_possible_truncation)]
        let exercises = record.exercises.len() as u32;
        total.exercises += exercises;
        total.reps = total.reps.saturating_add(record.total_reps());
        total.sets = total.sets.saturating_add(record.total_sets());
        total.volume += record.total_volume();
    }

    result
}
