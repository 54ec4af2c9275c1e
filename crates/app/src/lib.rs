#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use anyhow::{Context, anyhow};
use repvoice_domain::{
    self as domain, CreateError, CustomExerciseRepository, DeleteError, ExerciseDefinition,
    ExerciseID, RandomIds, ReadError, RecordBuilder, SystemClock, WorkoutID, WorkoutRecord,
    WorkoutRepository,
};
use repvoice_gateway::{ReqwestSendRequest, RemoteGenerator, SendRequest};
use repvoice_storage::{json_file::JsonFile, memory::Memory};

pub mod log;
pub mod settings;

pub use settings::Settings;

pub type Service<S = ReqwestSendRequest> =
    domain::Service<Store, RemoteGenerator<S>, SystemClock, RandomIds>;

/// Store selected by the configured data directory.
#[derive(Debug)]
pub enum Store {
    Memory(Memory),
    JsonFile(JsonFile),
}

impl Store {
    #[must_use]
    pub fn open(settings: &Settings) -> Self {
        match &settings.data_dir {
            Some(directory) => Store::JsonFile(JsonFile::new(directory)),
            None => Store::Memory(Memory::default()),
        }
    }
}

impl WorkoutRepository for Store {
    async fn read_workouts(&self, limit: Option<usize>) -> Result<Vec<WorkoutRecord>, ReadError> {
        match self {
            Store::Memory(store) => store.read_workouts(limit).await,
            Store::JsonFile(store) => store.read_workouts(limit).await,
        }
    }

    async fn create_workout(&self, workout: WorkoutRecord) -> Result<WorkoutRecord, CreateError> {
        match self {
            Store::Memory(store) => store.create_workout(workout).await,
            Store::JsonFile(store) => store.create_workout(workout).await,
        }
    }

    async fn delete_workout(&self, id: WorkoutID) -> Result<WorkoutID, DeleteError> {
        match self {
            Store::Memory(store) => store.delete_workout(id).await,
            Store::JsonFile(store) => store.delete_workout(id).await,
        }
    }

    async fn clear_workouts(&self) -> Result<(), DeleteError> {
        match self {
            Store::Memory(store) => store.clear_workouts().await,
            Store::JsonFile(store) => store.clear_workouts().await,
        }
    }
}

impl CustomExerciseRepository for Store {
    async fn read_custom_exercises(&self) -> Result<Vec<ExerciseDefinition>, ReadError> {
        match self {
            Store::Memory(store) => store.read_custom_exercises().await,
            Store::JsonFile(store) => store.read_custom_exercises().await,
        }
    }

    async fn create_custom_exercise(
        &self,
        exercise: ExerciseDefinition,
    ) -> Result<ExerciseDefinition, CreateError> {
        match self {
            Store::Memory(store) => store.create_custom_exercise(exercise).await,
            Store::JsonFile(store) => store.create_custom_exercise(exercise).await,
        }
    }

    async fn delete_custom_exercise(&self, id: &ExerciseID) -> Result<ExerciseID, DeleteError> {
        match self {
            Store::Memory(store) => store.delete_custom_exercise(id).await,
            Store::JsonFile(store) => store.delete_custom_exercise(id).await,
        }
    }
}

/// Wire store, generation endpoint and record builder according to `settings`.
pub async fn open(settings: &Settings) -> anyhow::Result<Service> {
    let sender =
        ReqwestSendRequest::new(settings.timeout()).context("failed to create HTTP client")?;
    open_with(settings, sender).await
}

/// Like [`open`], but sends requests to the generation endpoint through `sender`.
pub async fn open_with<S: SendRequest>(
    settings: &Settings,
    sender: S,
) -> anyhow::Result<Service<S>> {
    let generator = RemoteGenerator::new(sender, &settings.provider_config());
    let builder = RecordBuilder::new(
        generator,
        SystemClock,
        RandomIds,
        settings.resolver_policy(),
        settings.mode.into(),
    );
    let mut service = domain::Service::new(Store::open(settings), builder);
    service
        .load()
        .await
        .map_err(|err| anyhow!("failed to load custom exercises: {err}"))?;
    ::log::info!(
        "opened {} store with {} custom exercises",
        match service.repository() {
            Store::Memory(_) => "memory",
            Store::JsonFile(_) => "file",
        },
        service.registry().custom_definitions().count()
    );
    Ok(service)
}
