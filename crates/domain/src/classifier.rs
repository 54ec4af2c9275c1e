use log::warn;
use serde_json::Value;

use crate::{
    Category, ExerciseDefinition, ExerciseID, GatewayError, Name, Property, TextGenerator, Unit,
    extract_json_object,
};

const DEFAULT_CATEGORY: Category = Category::UpperBody;
const DEFAULT_UNIT: Unit = Unit::Count;
const DEFAULT_TARGET_MUSCLE: &str = "full body";
const DEFAULT_ICON: &str = "🏃";

#[derive(Debug, Clone, PartialEq)]
struct Classification {
    category: Category,
    target_muscle: String,
    icon: String,
    unit: Unit,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY,
            target_muscle: DEFAULT_TARGET_MUSCLE.to_string(),
            icon: DEFAULT_ICON.to_string(),
            unit: DEFAULT_UNIT,
        }
    }
}

/// Classify a new exercise by asking the generator. Falls back to a generic
/// upper body exercise counted in repetitions if the reply is not usable.
pub async fn classify<G: TextGenerator>(
    generator: &G,
    id: ExerciseID,
    name: Name,
) -> ExerciseDefinition {
    let classification = match request_classification(generator, &name).await {
        Ok(classification) => classification,
        Err(err) => {
            warn!("failed to classify exercise \"{name}\": {err}");
            Classification::default()
        }
    };
    ExerciseDefinition::custom(
        id,
        name,
        classification.category,
        &classification.target_muscle,
        classification.unit,
        &classification.icon,
    )
}

async fn request_classification<G: TextGenerator>(
    generator: &G,
    name: &Name,
) -> Result<Classification, GatewayError> {
    let reply = generator
        .generate(&instructions(), &format!("Exercise: {name}"))
        .await?;
    interpret(&reply)
}

fn instructions() -> String {
    let categories = Category::iter()
        .map(|c| format!("\"{}\"", c.name()))
        .collect::<Vec<_>>()
        .join(" | ");
    let units = Unit::iter()
        .map(|u| format!("\"{}\"", u.name()))
        .collect::<Vec<_>>()
        .join(" | ");
    format!(
        "You are a strength training expert. For the given exercise name reply with a single \
         JSON object and nothing else:\n\
         {{\"category\": {categories}, \"target_muscle\": \"main muscles worked\", \
         \"icon\": \"one fitting emoji\", \"unit\": {units}}}\n\n\
         Categories:\n\
         - upper-body: push-ups, pull-ups, arm exercises\n\
         - lower-body: squats, lunges, leg exercises\n\
         - core: plank, sit-ups, back extensions\n\
         - full-body: burpees, mountain climbers\n\
         - cardio: running, jogging\n\
         - other: stretching and anything else\n\n\
         Use \"seconds\" or \"minutes\" for exercises measured by duration."
    )
}

fn interpret(reply: &str) -> Result<Classification, GatewayError> {
    let object = extract_json_object(reply)
        .ok_or_else(|| GatewayError::Shape("reply contains no JSON object".to_string()))?;
    let field = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let category = field(&["category", "bodyPart", "body_part"])
        .ok_or_else(|| GatewayError::Shape("missing category".to_string()))?;
    let category = Category::parse(category)
        .ok_or_else(|| GatewayError::Shape(format!("unknown category \"{category}\"")))?;
    let unit = field(&["unit"])
        .ok_or_else(|| GatewayError::Shape("missing unit".to_string()))?;
    let unit = unit
        .parse::<Unit>()
        .map_err(|_| GatewayError::Shape(format!("unknown unit \"{unit}\"")))?;

    Ok(Classification {
        category,
        target_muscle: field(&["target_muscle", "targetMuscle"])
            .unwrap_or(DEFAULT_TARGET_MUSCLE)
            .to_string(),
        icon: field(&["icon"]).unwrap_or(DEFAULT_ICON).to_string(),
        unit,
    })
}
