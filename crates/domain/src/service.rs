use log::{debug, error, info};

use crate::{
    Clock, CreateError, CustomExerciseRepository, DeleteError, ExerciseDefinition, ExerciseID,
    IdGenerator, Name, ReadError, RecordBuilder, Registry, SubmitError, TextGenerator, WorkoutID,
    WorkoutRecord, WorkoutRepository, classify,
};

/// Entry point for callers: submissions, custom exercises and stored records.
pub struct Service<R, G, C, I> {
    repository: R,
    builder: RecordBuilder<G, C, I>,
    registry: Registry,
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R, G, C, I> Service<R, G, C, I>
where
    R: WorkoutRepository + CustomExerciseRepository,
    G: TextGenerator,
    C: Clock,
    I: IdGenerator,
{
    pub fn new(repository: R, builder: RecordBuilder<G, C, I>) -> Self {
        Self {
            repository,
            builder,
            registry: Registry::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Register the stored custom exercises.
    pub async fn load(&mut self) -> Result<(), ReadError> {
        let exercises = log_on_error!(
            self.repository.read_custom_exercises(),
            ReadError,
            "read",
            "custom exercises"
        )?;
        for exercise in exercises {
            if let Err(err) = self.registry.register(exercise) {
                debug!("skipped stored custom exercise: {err}");
            }
        }
        Ok(())
    }

    pub async fn log_workout(&self, utterance: &str) -> Result<WorkoutRecord, SubmitError> {
        let record = self.builder.submit(utterance, &self.registry).await?;
        let record = log_on_error!(
            self.repository.create_workout(record),
            CreateError,
            "create",
            "workout"
        )?;
        info!(
            "logged workout with {} exercise(s) at {}",
            record.exercises.len(),
            record.timestamp
        );
        Ok(record)
    }

    /// Classify and register a new exercise. An already known name yields the
    /// existing definition.
    pub async fn register_custom_exercise(&mut self, name: Name) -> ExerciseDefinition {
        if let Some(existing) = self.registry.find_by_exact_name(name.as_str()) {
            return existing.clone();
        }

        let id = ExerciseID::custom(self.builder.ids().next_id());
        let definition = classify(self.builder.generator(), id, name).await;

        if let Err(err) = self.registry.register(definition.clone()) {
            debug!("{err}");
        }
        // The exercise stays registered for this session even if saving fails.
        let _ = log_on_error!(
            self.repository.create_custom_exercise(definition.clone()),
            CreateError,
            "create",
            "custom exercise"
        );

        definition
    }

    /// Fixed catalog exercises and unknown ids are ignored.
    pub async fn delete_custom_exercise(
        &mut self,
        id: &ExerciseID,
    ) -> Result<ExerciseID, DeleteError> {
        if !self.registry.custom_definitions().any(|d| d.id == *id) {
            return Ok(id.clone());
        }
        log_on_error!(
            self.repository.delete_custom_exercise(id),
            DeleteError,
            "delete",
            "custom exercise"
        )?;
        self.registry.remove_custom(id);
        Ok(id.clone())
    }

    /// Stored records, newest first.
    pub async fn get_workouts(&self, limit: Option<usize>) -> Result<Vec<WorkoutRecord>, ReadError> {
        log_on_error!(
            self.repository.read_workouts(limit),
            ReadError,
            "read",
            "workouts"
        )
    }

    pub async fn get_todays_workouts(&self) -> Result<Vec<WorkoutRecord>, ReadError> {
        let today = self.builder.clock().today();
        Ok(self
            .get_workouts(None)
            .await?
            .into_iter()
            .filter(|w| w.date() == today)
            .collect())
    }

    pub async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
        log_on_error!(
            self.repository.delete_workout(id),
            DeleteError,
            "delete",
            "workout"
        )
    }

    pub async fn clear_workouts(&self) -> Result<(), DeleteError> {
        log_on_error!(
            self.repository.clear_workouts(),
            DeleteError,
            "clear",
            "workouts"
        )
    }
}
