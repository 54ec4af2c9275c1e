use log::{debug, warn};

use crate::{
    Clock, ExerciseEntry, Extraction, FallbackParser, Gateway, GatewayError, IdGenerator, Mode,
    Registry, Resolver, ResolverPolicy, SubmitError, TextGenerator, WorkoutID, WorkoutRecord,
};

/// Progress of a single submission.
///
/// `Idle → Gateway → Built`, or `Idle → Gateway → Fallback → Built | Failed`.
/// Blank input goes straight from `Idle` to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Gateway,
    Fallback,
    Built,
    Failed,
}

/// Turns utterances into workout records.
pub struct RecordBuilder<G, C, I> {
    gateway: Gateway<G>,
    fallback: FallbackParser,
    clock: C,
    ids: I,
}

impl<G: TextGenerator, C: Clock, I: IdGenerator> RecordBuilder<G, C, I> {
    pub fn new(generator: G, clock: C, ids: I, policy: ResolverPolicy, mode: Mode) -> Self {
        let resolver = Resolver::new(policy);
        Self {
            gateway: Gateway::new(generator, resolver, mode),
            fallback: FallbackParser::new(resolver, mode),
            clock,
            ids,
        }
    }

    pub fn generator(&self) -> &G {
        self.gateway.generator()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn ids(&self) -> &I {
        &self.ids
    }

    pub async fn submit(
        &self,
        utterance: &str,
        registry: &Registry,
    ) -> Result<WorkoutRecord, SubmitError> {
        self.trace(utterance, registry).await.1
    }

    /// Like [`RecordBuilder::submit`], additionally returning the stages passed through.
    pub async fn trace(
        &self,
        utterance: &str,
        registry: &Registry,
    ) -> (Vec<Stage>, Result<WorkoutRecord, SubmitError>) {
        let mut stages = vec![Stage::Idle];
        let mut enter = |stage: Stage| {
            debug!("submission stage {:?} -> {stage:?}", stages.last());
            stages.push(stage);
        };

        if utterance.trim().is_empty() {
            enter(Stage::Failed);
            return (stages, Err(SubmitError::EmptyInput));
        }

        enter(Stage::Gateway);
        let extraction = match self.extract(utterance, registry).await {
            Ok(extraction) => extraction,
            Err(err) => {
                warn!("falling back to pattern parsing: {err}");
                enter(Stage::Fallback);
                match self.parse(utterance, registry) {
                    Ok(exercises) => Extraction {
                        exercises,
                        attributed_date: None,
                    },
                    Err(err) => {
                        enter(Stage::Failed);
                        return (stages, Err(err));
                    }
                }
            }
        };

        enter(Stage::Built);
        (stages, Ok(self.build(utterance, extraction)))
    }

    /// Gateway stage on its own.
    pub async fn extract(
        &self,
        utterance: &str,
        registry: &Registry,
    ) -> Result<Extraction, GatewayError> {
        self.gateway
            .extract(utterance, registry, self.clock.today())
            .await
    }

    /// Fallback stage on its own.
    pub fn parse(
        &self,
        utterance: &str,
        registry: &Registry,
    ) -> Result<Vec<ExerciseEntry>, SubmitError> {
        self.fallback.parse(utterance, registry)
    }

    /// Final stage: stamp the extracted exercises with id and time.
    pub fn build(&self, utterance: &str, extraction: Extraction) -> WorkoutRecord {
        let now = self.clock.now();
        let timestamp = extraction
            .attributed_date
            .map_or(now, |date| date.and_time(now.time()));
        WorkoutRecord {
            id: WorkoutID::from(self.ids.next_id()),
            timestamp,
            raw_input: utterance.to_string(),
            exercises: extraction.exercises,
            created_at: now,
            updated_at: now,
        }
    }
}
