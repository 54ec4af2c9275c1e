#![allow(clippy::missing_errors_doc)]

use std::cell::RefCell;

use repvoice_domain as domain;

use crate::newest_first;

/// Volatile store, used when no data directory is configured.
#[derive(Debug, Default)]
pub struct Memory {
    workouts: RefCell<Vec<domain::WorkoutRecord>>,
    custom_exercises: RefCell<Vec<domain::ExerciseDefinition>>,
}

impl domain::WorkoutRepository for Memory {
    async fn read_workouts(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<domain::WorkoutRecord>, domain::ReadError> {
        Ok(newest_first(self.workouts.borrow().clone(), limit))
    }

    async fn create_workout(
        &self,
        workout: domain::WorkoutRecord,
    ) -> Result<domain::WorkoutRecord, domain::CreateError> {
        let mut workouts = self.workouts.borrow_mut();
        if workouts.iter().any(|w| w.id == workout.id) {
            return Err(domain::CreateError::Conflict);
        }
        workouts.push(workout.clone());
        Ok(workout)
    }

    async fn delete_workout(
        &self,
        id: domain::WorkoutID,
    ) -> Result<domain::WorkoutID, domain::DeleteError> {
        self.workouts.borrow_mut().retain(|w| w.id != id);
        Ok(id)
    }

    async fn clear_workouts(&self) -> Result<(), domain::DeleteError> {
        self.workouts.borrow_mut().clear();
        Ok(())
    }
}

impl domain::CustomExerciseRepository for Memory {
    async fn read_custom_exercises(
        &self,
    ) -> Result<Vec<domain::ExerciseDefinition>, domain::ReadError> {
        Ok(self.custom_exercises.borrow().clone())
    }

    async fn create_custom_exercise(
        &self,
        exercise: domain::ExerciseDefinition,
    ) -> Result<domain::ExerciseDefinition, domain::CreateError> {
        let mut exercises = self.custom_exercises.borrow_mut();
        if exercises.iter().any(|e| e.id == exercise.id) {
            return Err(domain::CreateError::Conflict);
        }
        exercises.push(exercise.clone());
        Ok(exercise)
    }

    async fn delete_custom_exercise(
        &self,
        id: &domain::ExerciseID,
    ) -> Result<domain::ExerciseID, domain::DeleteError> {
        self.custom_exercises.borrow_mut().retain(|e| e.id != *id);
        Ok(id.clone())
    }
}
