use std::fmt::Write;

use chrono::NaiveDate;
use log::debug;
use serde_json::Value;

use crate::{
    ExerciseEntry, GatewayError, Mode, Name, Property, Registry, Resolver, WeightUnit, catalog,
};

/// A remote service turning an instruction set and a user message into text.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn generate(&self, instructions: &str, message: &str) -> Result<String, GatewayError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub exercises: Vec<ExerciseEntry>,
    pub attributed_date: Option<NaiveDate>,
}

/// Structured extraction of exercises through a [`TextGenerator`].
#[derive(Debug, Clone)]
pub struct Gateway<G> {
    generator: G,
    resolver: Resolver,
    mode: Mode,
}

impl<G: TextGenerator> Gateway<G> {
    pub fn new(generator: G, resolver: Resolver, mode: Mode) -> Self {
        Self {
            generator,
            resolver,
            mode,
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub async fn extract(
        &self,
        utterance: &str,
        registry: &Registry,
        today: NaiveDate,
    ) -> Result<Extraction, GatewayError> {
        let instructions = instructions(registry, today, self.mode);
        let reply = self.generator.generate(&instructions, utterance).await?;
        self.interpret(&reply, registry)
    }

    /// Validate a generated reply against the registry.
    pub fn interpret(&self, reply: &str, registry: &Registry) -> Result<Extraction, GatewayError> {
        let object = extract_json_object(reply)
            .ok_or_else(|| GatewayError::Shape("reply contains no JSON object".to_string()))?;
        let Some(entries) = object.get("exercises").and_then(Value::as_array) else {
            return Err(GatewayError::Shape(
                "reply has no \"exercises\" array".to_string(),
            ));
        };

        let mut exercises = vec![];
        let mut first_dropped = None;

        for entry in entries {
            let candidate = entry.get("name").and_then(Value::as_str).unwrap_or_default();
            match self.resolver.resolve(candidate, registry) {
                Some(name) => exercises.push(self.entry(name, entry)),
                None => {
                    debug!("dropped unrecognized exercise \"{candidate}\"");
                    if first_dropped.is_none() && !candidate.trim().is_empty() {
                        first_dropped = Some(candidate.trim().to_string());
                    }
                }
            }
        }

        if exercises.is_empty() {
            return Err(GatewayError::NoRecognizedExercise {
                best_guess: first_dropped,
            });
        }

        let attributed_date = object
            .get("date")
            .and_then(Value::as_str)
            .and_then(|date| NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok());

        Ok(Extraction {
            exercises,
            attributed_date,
        })
    }

    fn entry(&self, name: Name, value: &Value) -> ExerciseEntry {
        #[allow(clippy::cast_possible_truncation)]
        let weight = number(value.get("weight")).unwrap_or_default() as f32;
        let weight_unit = value
            .get("weight_unit")
            .and_then(Value::as_str)
            .and_then(WeightUnit::parse)
            .unwrap_or_default();
        let reps = count(value.get("reps")).unwrap_or(0);
        let sets = count(value.get("sets"));
        ExerciseEntry::new(name, weight, weight_unit, reps, sets).in_mode(self.mode)
    }
}

/// Instruction set for extracting workouts from an utterance spoken on `today`.
#[must_use]
pub fn instructions(registry: &Registry, today: NaiveDate, mode: Mode) -> String {
    let mut result = String::from(
        "You convert a spoken workout log into JSON. \
         The text comes from speech recognition and may contain misheard words.\n\n",
    );

    let _ = writeln!(result, "Today is {} ({}).\n", today.format("%Y-%m-%d"), today.format("%A"));

    result.push_str("Use only these exercise names, spelled exactly as listed:\n");
    for definition in registry.all_definitions() {
        let _ = writeln!(result, "- {} ({})", definition.name, definition.unit.name());
    }

    result.push_str("\nKnown misrecognitions and the exercise they stand for:\n");
    for (heard, name) in catalog::CORRECTIONS {
        let _ = writeln!(result, "- \"{heard}\" means \"{name}\"");
    }

    result.push_str(
        "\nRules:\n\
         - Reply with a single JSON object and nothing else.\n\
         - Use the form {\"date\": \"YYYY-MM-DD\", \"exercises\": [{\"name\": \"push-ups\", \
         \"weight\": 0, \"weight_unit\": \"kg\", \"reps\": 20, \"sets\": 3}]}.\n\
         - Resolve relative dates like \"yesterday\", \"the day before yesterday\", \
         \"last Monday\", 昨日 or 一昨日 against today. Copy absolute dates such as \
         \"March 3\" or 3月3日 using the current year. Leave out \"date\" if no date is mentioned.\n\
         - If the number of sets is not mentioned, use 1.\n\
         - For timed exercises put the duration into \"reps\", measured in the listed unit.\n",
    );

    result.push_str(match mode {
        Mode::Bodyweight => {
            "- All exercises are bodyweight exercises. Always set \"weight\" to 0.\n"
        }
        Mode::Weighted => {
            "- Report the weight as spoken with \"weight_unit\" \"kg\" or \"lb\". \
             Use 0 if no weight is mentioned.\n"
        }
    });

    result.push_str("- Leave out anything that is not one of the listed exercises.\n");

    result
}

/// First balanced `{...}` substring of `text` that parses as a JSON object.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<Value> {
    text.char_indices()
        .filter(|(_, c)| *c == '{')
        .find_map(|(start, _)| {
            let end = balanced_end(&text[start..])?;
            match serde_json::from_str::<Value>(&text[start..start + end]) {
                Ok(value @ Value::Object(_)) => Some(value),
                _ => None,
            }
        })
}

/// Byte length of the brace-balanced prefix of `text`, honoring JSON strings.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

fn number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(string) => string.trim().parse().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite() && *n >= 0.0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count(value: Option<&Value>) -> Option<u32> {
    number(value).map(|n| n.round().min(f64::from(u32::MAX)) as u32)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::tests::data::{MockGenerator, today};

    fn gateway(reply: Result<&str, GatewayError>, mode: Mode) -> Gateway<MockGenerator> {
        Gateway::new(MockGenerator::new(vec![reply]), Resolver::default(), mode)
    }

    fn summary(extraction: &Extraction) -> Vec<(String, f32, u32, u32, f32)> {
        extraction
            .exercises
            .iter()
            .map(|e| {
                (
                    e.name().to_string(),
                    e.weight(),
                    e.reps(),
                    e.sets(),
                    e.volume(),
                )
            })
            .collect()
    }

    #[rstest]
    #[case::plain(r#"{"a": 1}"#, Some(json!({"a": 1})))]
    #[case::code_block("```json\n{\"a\": {\"b\": 2}}\n```", Some(json!({"a": {"b": 2}})))]
    #[case::prose_before(r#"Sure! {"a": "}"} done"#, Some(json!({"a": "}"})))]
    #[case::skips_unparseable(r#"{not json} {"a": 1}"#, Some(json!({"a": 1})))]
    #[case::escaped_quote(r#"{"a": "x\"}"}"#, Some(json!({"a": "x\"}"})))]
    #[case::unbalanced(r#"{"a": 1"#, None)]
    #[case::no_object("no json here", None)]
    fn test_extract_json_object(#[case] text: &str, #[case] expected: Option<Value>) {
        assert_eq!(extract_json_object(text), expected);
    }

    #[test]
    fn test_instructions() {
        let registry = Registry::new();
        let text = instructions(&registry, today(), Mode::Bodyweight);

        assert!(text.contains("Today is 2020-02-02 (Sunday)"));
        for name in registry.canonical_names() {
            assert!(text.contains(&format!("- {name} (")), "missing {name}");
        }
        assert!(text.contains("\"pool ups\" means \"pull-ups\""));
        assert!(text.contains("use 1"));
        assert!(text.contains("Always set \"weight\" to 0"));
        assert!(
            !instructions(&registry, today(), Mode::Weighted).contains("Always set \"weight\" to 0")
        );
    }

    #[tokio::test]
    async fn test_extract() {
        let gateway = gateway(
            Ok(r#"{"exercises": [{"name": "push-ups", "weight": 0, "weight_unit": "kg", "reps": 20, "sets": 3}]}"#),
            Mode::Bodyweight,
        );

        let extraction = gateway
            .extract("push-ups 20 times 3 sets", &Registry::new(), today())
            .await
            .unwrap();

        assert_eq!(
            summary(&extraction),
            vec![("push-ups".to_string(), 0.0, 20, 3, 60.0)]
        );
        assert_eq!(extraction.attributed_date, None);

        let calls = gateway.generator().calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("push-ups"));
        assert_eq!(calls[0].1, "push-ups 20 times 3 sets");
    }

    #[tokio::test]
    async fn test_extract_transport_error() {
        let gateway = gateway(
            Err(GatewayError::Transport("connection refused".to_string())),
            Mode::Bodyweight,
        );

        assert!(matches!(
            gateway.extract("squats 10 times", &Registry::new(), today()).await,
            Err(GatewayError::Transport(_))
        ));
    }

    #[test]
    fn test_interpret_defaults_and_resolution() {
        let gateway = gateway(Ok(""), Mode::Bodyweight);

        let extraction = gateway
            .interpret(
                r#"Here you go: {"date": "2020-02-01", "exercises": [
                    {"name": "pool ups", "reps": "8"},
                    {"name": "bench press", "reps": 10, "sets": 3},
                    {"name": "Squats", "weight": 40, "reps": 10, "sets": 0},
                    {"name": "plank", "reps": 60.4, "sets": 2}
                ]}"#,
                &Registry::new(),
            )
            .unwrap();

        assert_eq!(
            summary(&extraction),
            vec![
                ("pull-ups".to_string(), 0.0, 8, 1, 8.0),
                ("squats".to_string(), 0.0, 10, 1, 10.0),
                ("plank".to_string(), 0.0, 60, 2, 120.0),
            ]
        );
        assert_eq!(extraction.attributed_date, NaiveDate::from_ymd_opt(2020, 2, 1));
    }

    #[test]
    fn test_interpret_weighted() {
        let gateway = gateway(Ok(""), Mode::Weighted);

        let extraction = gateway
            .interpret(
                r#"{"exercises": [{"name": "squats", "weight": 60, "weight_unit": "lbs", "reps": 10, "sets": 3}]}"#,
                &Registry::new(),
            )
            .unwrap();

        let entry = &extraction.exercises[0];
        assert_eq!(entry.weight_unit(), WeightUnit::Lb);
        assert_approx_eq!(entry.volume(), 1800.0);
    }

    #[rstest]
    #[case::invalid_date(r#"{"date": "yesterday", "exercises": [{"name": "dips", "reps": 5}]}"#)]
    #[case::missing_date(r#"{"exercises": [{"name": "dips", "reps": 5}]}"#)]
    fn test_interpret_without_date(#[case] reply: &str) {
        let extraction = gateway(Ok(""), Mode::Bodyweight)
            .interpret(reply, &Registry::new())
            .unwrap();

        assert_eq!(extraction.attributed_date, None);
        assert_eq!(extraction.exercises.len(), 1);
    }

    #[rstest]
    #[case::no_json("I could not understand that.")]
    #[case::no_exercises(r#"{"result": []}"#)]
    #[case::exercises_not_array(r#"{"exercises": "push-ups"}"#)]
    fn test_interpret_shape_error(#[case] reply: &str) {
        assert!(matches!(
            gateway(Ok(""), Mode::Bodyweight).interpret(reply, &Registry::new()),
            Err(GatewayError::Shape(_))
        ));
    }

    #[rstest]
    #[case::empty(r#"{"exercises": []}"#, None)]
    #[case::unknown(
        r#"{"exercises": [{"name": "bench press"}, {"name": "deadlift"}]}"#,
        Some("bench press")
    )]
    #[case::nameless(r#"{"exercises": [{"reps": 3}]}"#, None)]
    fn test_interpret_no_recognized_exercise(
        #[case] reply: &str,
        #[case] expected: Option<&str>,
    ) {
        let result = gateway(Ok(""), Mode::Bodyweight).interpret(reply, &Registry::new());

        match result {
            Err(GatewayError::NoRecognizedExercise { best_guess }) => {
                assert_eq!(best_guess.as_deref(), expected);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
