use std::sync::LazyLock;

use log::debug;
use regex::{Captures, Regex};

use crate::{ExerciseEntry, Mode, Registry, Resolver, SubmitError, WeightUnit};

const NAME: &str = r"(?P<name>[^\d,、。;]+?)";
const WEIGHT: &str = r"(?P<weight>\d+(?:\.\d+)?)\s*(?P<unit>kilograms?|kilos?|kgs?|キロ|pounds?|lbs?)";
const REPS: &str = r"(?P<reps>\d+)\s*(?:reps?|times?|seconds?|secs?|minutes?|mins?|回|秒|分)?";
const SETS: &str = r"(?P<sets>\d+)\s*(?:sets?|セット)";
/// Name following the counts, as in "3 sets of 20 push-ups".
const TRAILING_NAME: &str = r"(?P<name>[^\d,、。;]+?)(?:\s+(?:and|then|plus)\s|[,、。;]|$)";

/// Patterns from most to least specific.
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"(?i){NAME}\s*{WEIGHT}\s*(?:x\s*)?{REPS}\s*(?:x\s*)?{SETS}"),
        format!(r"(?i){NAME}\s*{WEIGHT}\s*(?:x\s*)?{REPS}"),
        format!(r"(?i){NAME}\s*{REPS}\s*(?:x\s*)?{SETS}"),
        format!(r"(?i){SETS}\s*(?:of\s*)?{REPS}\s*{TRAILING_NAME}"),
        format!(r"(?i){NAME}\s*{REPS}"),
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

const CONNECTORS: [&str; 6] = ["and ", "then ", "also ", "plus ", "did ", "で"];

/// Pattern based extraction, used when the generation endpoint is not usable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackParser {
    resolver: Resolver,
    mode: Mode,
}

impl FallbackParser {
    #[must_use]
    pub fn new(resolver: Resolver, mode: Mode) -> Self {
        Self { resolver, mode }
    }

    pub fn parse(
        &self,
        utterance: &str,
        registry: &Registry,
    ) -> Result<Vec<ExerciseEntry>, SubmitError> {
        let mut first_token = None;
        let mut matched = false;

        for pattern in PATTERNS.iter() {
            let mut exercises = vec![];

            for captures in pattern.captures_iter(utterance) {
                matched = true;
                let token = name_token(&captures);
                if token.is_empty() {
                    continue;
                }
                match self.resolver.resolve(&token, registry) {
                    Some(name) => {
                        #[allow(clippy::cast_possible_truncation)]
                        let weight = number::<f64>(&captures, "weight").unwrap_or_default() as f32;
                        let weight_unit = captures
                            .name("unit")
                            .and_then(|unit| WeightUnit::parse(unit.as_str()))
                            .unwrap_or_default();
                        let reps = number(&captures, "reps").unwrap_or(0);
                        let sets = number(&captures, "sets");
                        exercises.push(
                            ExerciseEntry::new(name, weight, weight_unit, reps, sets)
                                .in_mode(self.mode),
                        );
                    }
                    None => {
                        debug!("discarded unrecognized token \"{token}\"");
                        first_token.get_or_insert(token);
                    }
                }
            }

            if !exercises.is_empty() {
                return Ok(exercises);
            }
        }

        let utterance = utterance.trim();

        if !matched {
            if let Some(name) = self.resolver.resolve(utterance, registry) {
                return Ok(vec![ExerciseEntry::bodyweight(name, 0, None)]);
            }
        }

        Err(SubmitError::NoRecognizedExercise {
            best_guess: first_token.or_else(|| {
                utterance
                    .split_whitespace()
                    .next()
                    .map(ToString::to_string)
            }),
        })
    }
}

fn name_token(captures: &Captures) -> String {
    let mut token = captures
        .name("name")
        .map_or("", |m| m.as_str())
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '.' | '!' | '、' | '。'));

    while let Some(rest) = CONNECTORS.iter().find_map(|connector| {
        token
            .get(..connector.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(connector))
            .map(|_| &token[connector.len()..])
    }) {
        token = rest.trim_start();
    }

    token.to_string()
}

fn number<T: std::str::FromStr>(captures: &Captures, group: &str) -> Option<T> {
    captures.name(group)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn parse(utterance: &str, mode: Mode) -> Result<Vec<(String, f32, u32, u32)>, SubmitError> {
        FallbackParser::new(Resolver::default(), mode)
            .parse(utterance, &Registry::new())
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| (e.name().to_string(), e.weight(), e.reps(), e.sets()))
                    .collect()
            })
    }

    #[test]
    fn test_patterns_compile() {
        assert_eq!(PATTERNS.len(), 5);
    }

    #[rstest]
    #[case::reps_and_sets("push-ups 20 times 3 sets", vec![("push-ups", 0.0, 20, 3)])]
    #[case::reps_only("squats 10 times", vec![("squats", 0.0, 10, 1)])]
    #[case::misrecognition("pool ups 8 reps 2 sets", vec![("pull-ups", 0.0, 8, 2)])]
    #[case::compact("dips 12x3 sets", vec![("dips", 0.0, 12, 3)])]
    #[case::timed("plank 60 seconds", vec![("plank", 0.0, 60, 1)])]
    #[case::multiple(
        "push-ups 20 times 3 sets and squats 15 reps 2 sets",
        vec![("push-ups", 0.0, 20, 3), ("squats", 0.0, 15, 2)]
    )]
    #[case::comma_separated(
        "burpees 10, lunges 20 times",
        vec![("burpees", 0.0, 10, 1), ("lunges", 0.0, 20, 1)]
    )]
    #[case::japanese("腕立て伏せ20回3セット", vec![("push-ups", 0.0, 20, 3)])]
    #[case::japanese_multiple(
        "スクワット30回、腹筋20回",
        vec![("squats", 0.0, 30, 1), ("sit-ups", 0.0, 20, 1)]
    )]
    #[case::weight_zeroed("squats 60kg 10 reps 3 sets", vec![("squats", 0.0, 10, 3)])]
    #[case::unknown_tokens_discarded(
        "bench press 10 times, dips 8 times",
        vec![("dips", 0.0, 8, 1)]
    )]
    #[case::name_only("Plank", vec![("plank", 0.0, 0, 1)])]
    #[case::weight_without_sets("squats 60kg 10 reps", vec![("squats", 0.0, 10, 1)])]
    #[case::sets_first("3 sets of 20 push-ups", vec![("push-ups", 0.0, 20, 3)])]
    #[case::sets_first_multiple(
        "3 sets of 20 push-ups and 2 sets of 10 dips",
        vec![("push-ups", 0.0, 20, 3), ("dips", 0.0, 10, 2)]
    )]
    fn test_parse(#[case] utterance: &str, #[case] expected: Vec<(&str, f32, u32, u32)>) {
        assert_eq!(
            parse(utterance, Mode::Bodyweight).unwrap(),
            expected
                .into_iter()
                .map(|(name, weight, reps, sets)| (name.to_string(), weight, reps, sets))
                .collect::<Vec<_>>()
        );
    }

    #[rstest]
    #[case::weight_reps_sets("squats 60kg 10 reps 3 sets", 60.0, WeightUnit::Kg, 10, 3)]
    #[case::japanese_kilo("スクワット40キロ10回3セット", 40.0, WeightUnit::Kg, 10, 3)]
    #[case::pounds("lunges 25.5 lbs 12 reps 2 sets", 25.5, WeightUnit::Lb, 12, 2)]
    #[case::weight_without_sets("squats 60kg 10 reps", 60.0, WeightUnit::Kg, 10, 1)]
    #[case::japanese_without_sets("スクワット40キロ10回", 40.0, WeightUnit::Kg, 10, 1)]
    fn test_parse_weighted(
        #[case] utterance: &str,
        #[case] weight: f32,
        #[case] weight_unit: WeightUnit,
        #[case] reps: u32,
        #[case] sets: u32,
    ) {
        let entries = FallbackParser::new(Resolver::default(), Mode::Weighted)
            .parse(utterance, &Registry::new())
            .unwrap();

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_approx_eq!(entry.weight(), weight);
        assert_eq!(entry.weight_unit(), weight_unit);
        assert_eq!(entry.reps(), reps);
        assert_eq!(entry.sets(), sets);
        #[allow(clippy::cast_precision_loss)]
        let volume = weight * reps as f32 * sets as f32;
        assert_approx_eq!(entry.volume(), volume, 0.01);
    }

    #[rstest]
    #[case::unknown_word("hello", Some("hello"))]
    #[case::unknown_with_numbers("bench press 10 times", Some("bench press"))]
    #[case::first_word("hello there", Some("hello"))]
    #[case::blank("   ", None)]
    #[case::count_without_known_name("sets of 20 push-ups", Some("sets of"))]
    fn test_parse_no_recognized_exercise(
        #[case] utterance: &str,
        #[case] expected: Option<&str>,
    ) {
        match parse(utterance, Mode::Bodyweight) {
            Err(SubmitError::NoRecognizedExercise { best_guess }) => {
                assert_eq!(best_guess.as_deref(), expected);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[rstest]
    #[case(" and squats ", "squats")]
    #[case("then also dips:", "dips")]
    #[case("、腹筋", "腹筋")]
    fn test_name_token(#[case] name: &str, #[case] expected: &str) {
        let pattern = Regex::new(r"(?P<name>.*)").unwrap();
        let captures = pattern.captures(name).unwrap();

        assert_eq!(name_token(&captures), expected);
    }
}
