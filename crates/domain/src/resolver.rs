use crate::{Name, Registry};

/// Character class a candidate must contain at least once to be considered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScriptCheck {
    Any,
    #[default]
    Alphabetic,
    Japanese,
}

impl ScriptCheck {
    #[must_use]
    pub fn accepts(self, candidate: &str) -> bool {
        match self {
            ScriptCheck::Any => !candidate.trim().is_empty(),
            ScriptCheck::Alphabetic => candidate.chars().any(char::is_alphabetic),
            ScriptCheck::Japanese => candidate.chars().any(is_japanese),
        }
    }
}

fn is_japanese(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}' // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{4E00}'..='\u{9FFF}' // CJK unified ideographs
        | '\u{FF66}'..='\u{FF9F}' // Halfwidth katakana
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverPolicy {
    pub max_distance: usize,
    pub script_check: ScriptCheck,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self {
            max_distance: 2,
            script_check: ScriptCheck::default(),
        }
    }
}

/// Maps free-form candidates onto canonical exercise names.
///
/// Tiers are evaluated in order and the first success wins: exact canonical
/// name, alias, fuzzy match within `max_distance` edits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    policy: ResolverPolicy,
}

impl Resolver {
    #[must_use]
    pub fn new(policy: ResolverPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> ResolverPolicy {
        self.policy
    }

    #[must_use]
    pub fn resolve(&self, candidate: &str, registry: &Registry) -> Option<Name> {
        let candidate = candidate.trim();

        if !self.policy.script_check.accepts(candidate) {
            return None;
        }

        if let Some(definition) = registry.find_by_exact_name(candidate) {
            return Some(definition.name.clone());
        }

        if let Some(definition) = registry.find_by_alias(candidate) {
            return Some(definition.name.clone());
        }

        let candidate = candidate.to_lowercase();
        registry
            .canonical_names()
            .map(|name| (name, edit_distance(&candidate, &name.key())))
            .filter(|(_, distance)| *distance <= self.policy.max_distance)
            // min_by_key keeps the first of equal elements, i.e. catalog order
            .min_by_key(|(_, distance)| *distance)
            .map(|(name, _)| name.clone())
    }
}

/// Levenshtein distance with unit costs, computed over Unicode scalar values.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();

    let mut previous = (0..=b.len()).collect::<Vec<_>>();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{Category, ExerciseDefinition, ExerciseID, Unit};

    #[rstest]
    #[case("", "", 0)]
    #[case("", "abc", 3)]
    #[case("abc", "", 3)]
    #[case("kitten", "sitting", 3)]
    #[case("plank", "planck", 1)]
    #[case("squats", "sqauts", 2)]
    #[case("懸垂", "懸水", 1)]
    fn test_edit_distance(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(edit_distance(a, b), expected);
        assert_eq!(edit_distance(b, a), expected);
    }

    #[test]
    fn test_resolve_canonical_names() {
        let registry = Registry::new();
        let resolver = Resolver::default();

        for name in registry.canonical_names() {
            assert_eq!(
                resolver.resolve(name.as_str(), &registry).as_ref(),
                Some(name)
            );
        }
    }

    #[test]
    fn test_resolve_aliases() {
        let registry = Registry::new();
        let resolver = Resolver::default();

        for definition in registry.all_definitions() {
            for alias in &definition.aliases {
                assert_eq!(
                    resolver.resolve(alias, &registry).as_ref(),
                    Some(&definition.name),
                    "alias \"{alias}\""
                );
            }
        }
    }

    #[rstest]
    #[case::one_edit("planck", Some("plank"))]
    #[case::two_edits("lunjez", Some("lunges"))]
    #[case::transposition("sqauts", Some("squats"))]
    #[case::uppercase("WALKNG", Some("walking"))]
    #[case::inner_whitespace("calf   raises", Some("calf raises"))]
    #[case::three_edits("plxnkxx", None)]
    #[case::unrelated("hello", None)]
    #[case::digits_only("123", None)]
    #[case::blank("   ", None)]
    fn test_resolve(#[case] candidate: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            Resolver::default()
                .resolve(candidate, &Registry::new())
                .map(|n| n.to_string())
                .as_deref(),
            expected
        );
    }

    #[test]
    fn test_resolve_fuzzy_tie_prefers_catalog_order() {
        let mut registry = Registry::empty();
        for (id, name) in [("a", "abcd"), ("b", "abce")] {
            registry
                .register(ExerciseDefinition::custom(
                    ExerciseID::from(id),
                    Name::new(name).unwrap(),
                    Category::Other,
                    "",
                    Unit::Count,
                    "",
                ))
                .unwrap();
        }

        assert_eq!(
            Resolver::default()
                .resolve("abcx", &registry)
                .map(|n| n.to_string()),
            Some("abcd".to_string())
        );
    }

    #[test]
    fn test_resolve_policy_max_distance() {
        let resolver = Resolver::new(ResolverPolicy {
            max_distance: 0,
            ..ResolverPolicy::default()
        });

        assert_eq!(resolver.resolve("planck", &Registry::new()), None);
    }

    #[rstest]
    #[case(ScriptCheck::Any, "123", true)]
    #[case(ScriptCheck::Alphabetic, "123", false)]
    #[case(ScriptCheck::Alphabetic, "squats", true)]
    #[case(ScriptCheck::Alphabetic, "腹筋", true)]
    #[case(ScriptCheck::Japanese, "squats", false)]
    #[case(ScriptCheck::Japanese, "スクワット", true)]
    fn test_script_check_accepts(
        #[case] check: ScriptCheck,
        #[case] candidate: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(check.accepts(candidate), expected);
    }

    #[test]
    fn test_resolve_japanese_script_check() {
        let resolver = Resolver::new(ResolverPolicy {
            script_check: ScriptCheck::Japanese,
            ..ResolverPolicy::default()
        });

        assert_eq!(resolver.resolve("squats", &Registry::new()), None);
        assert_eq!(
            resolver
                .resolve("スクワット", &Registry::new())
                .map(|n| n.to_string()),
            Some("squats".to_string())
        );
    }
}
