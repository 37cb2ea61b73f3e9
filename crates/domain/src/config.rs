use std::collections::{BTreeMap, BTreeSet};

use derive_more::{AsRef, Display};
use log::warn;
use serde::Deserialize;

use crate::ConfigError;

/// Name of a set of reference maxima, e.g. `female` or `male`.
#[derive(AsRef, Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Profile(String);

impl From<&str> for Profile {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Weighted average over all trained exercises.
    #[default]
    Weighted,
    /// Exercises are variants of one movement, only the best variant counts.
    BestVariant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub kind: CategoryKind,
    pub exercises: Vec<String>,
}

impl Category {
    #[must_use]
    pub fn weighted(name: &str, exercises: &[&str]) -> Self {
        Self::new(name, CategoryKind::Weighted, exercises)
    }

    #[must_use]
    pub fn best_variant(name: &str, exercises: &[&str]) -> Self {
        Self::new(name, CategoryKind::BestVariant, exercises)
    }

    fn new(name: &str, kind: CategoryKind, exercises: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind,
            exercises: exercises.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Ordered muscle-group categories and their exercises.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseCatalog {
    categories: Vec<Category>,
}

impl ExerciseCatalog {
    pub fn new(categories: Vec<Category>) -> Result<Self, ConfigError> {
        let mut names = BTreeSet::new();
        for category in &categories {
            if !names.insert(category.name.as_str()) {
                return Err(ConfigError::DuplicateCategory(category.name.clone()));
            }
            let mut exercises = BTreeSet::new();
            for exercise in &category.exercises {
                if !exercises.insert(exercise.as_str()) {
                    return Err(ConfigError::DuplicateExercise {
                        category: category.name.clone(),
                        exercise: exercise.clone(),
                    });
                }
            }
        }
        Ok(Self { categories })
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }
}

/// Reference maxima by profile, category and exercise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationTable {
    maxima: BTreeMap<Profile, BTreeMap<String, BTreeMap<String, f32>>>,
}

impl NormalizationTable {
    #[must_use]
    pub fn new(maxima: BTreeMap<Profile, BTreeMap<String, BTreeMap<String, f32>>>) -> Self {
        Self { maxima }
    }

    pub fn insert(&mut self, profile: &Profile, category: &str, exercise: &str, maximum: f32) {
        self.maxima
            .entry(profile.clone())
            .or_default()
            .entry(category.to_string())
            .or_default()
            .insert(exercise.to_string(), maximum);
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.maxima.keys()
    }

    #[must_use]
    pub fn contains_profile(&self, profile: &Profile) -> bool {
        self.maxima.contains_key(profile)
    }

    #[must_use]
    pub fn maximum(&self, profile: &Profile, category: &str, exercise: &str) -> Option<f32> {
        self.maxima
            .get(profile)?
            .get(category)?
            .get(exercise)
            .copied()
    }
}

/// Relative importance of exercises inside a category. Absent weights are 1.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseWeights {
    weights: BTreeMap<String, BTreeMap<String, f32>>,
}

impl ExerciseWeights {
    pub fn insert(&mut self, category: &str, exercise: &str, weight: f32) {
        self.weights
            .entry(category.to_string())
            .or_default()
            .insert(exercise.to_string(), weight);
    }

    #[must_use]
    pub fn weight(&self, category: &str, exercise: &str) -> f32 {
        self.weights
            .get(category)
            .and_then(|w| w.get(exercise))
            .copied()
            .unwrap_or(1.0)
    }
}

/// Validated combination of catalog, normalization table and weights.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    catalog: ExerciseCatalog,
    table: NormalizationTable,
    weights: ExerciseWeights,
}

impl ScoringConfig {
    /// Every catalog exercise needs a reference maximum for every profile of the table.
    pub fn new(
        catalog: ExerciseCatalog,
        table: NormalizationTable,
        weights: ExerciseWeights,
    ) -> Result<Self, ConfigError> {
        if table.maxima.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        for profile in table.profiles() {
            for category in catalog.categories() {
                for exercise in &category.exercises {
                    let Some(maximum) = table.maximum(profile, &category.name, exercise) else {
                        return Err(ConfigError::MissingMaximum {
                            profile: profile.to_string(),
                            category: category.name.clone(),
                            exercise: exercise.clone(),
                        });
                    };
                    if !maximum.is_finite() || maximum < 0.0 {
                        return Err(ConfigError::InvalidMaximum {
                            profile: profile.to_string(),
                            exercise: exercise.clone(),
                            value: maximum,
                        });
                    }
                    if maximum == 0.0 {
                        warn!("reference maximum of {exercise} for {profile} is zero");
                    }
                }
            }
        }

        for (category_name, exercises) in &weights.weights {
            let Some(category) = catalog.category(category_name) else {
                return Err(ConfigError::UnknownCategory(category_name.clone()));
            };
            for (exercise, weight) in exercises {
                if !category.exercises.contains(exercise) {
                    return Err(ConfigError::UnknownExercise {
                        category: category_name.clone(),
                        exercise: exercise.clone(),
                    });
                }
                if !weight.is_finite() || *weight <= 0.0 {
                    return Err(ConfigError::InvalidWeight {
                        exercise: exercise.clone(),
                        value: *weight,
                    });
                }
            }
        }

        Ok(Self {
            catalog,
            table,
            weights,
        })
    }

    /// Parse a configuration document.
    ///
    /// ```json
    /// {
    ///   "categories": [
    ///     {
    ///       "name": "legs",
    ///       "kind": "weighted",
    ///       "exercises": [
    ///         { "name": "deadlift", "weight": 1.2, "maxima": { "female": 90, "male": 180 } }
    ///       ]
    ///     }
    ///   ]
    /// }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            serde_json::from_str(json).map_err(|err| ConfigError::Format(err.to_string()))?;

        let mut table = NormalizationTable::default();
        let mut weights = ExerciseWeights::default();
        let mut categories = vec![];

        for category in file.categories {
            for exercise in &category.exercises {
                for (profile, maximum) in &exercise.maxima {
                    table.insert(
                        &Profile::from(profile.as_str()),
                        &category.name,
                        &exercise.name,
                        *maximum,
                    );
                }
                if let Some(weight) = exercise.weight {
                    weights.insert(&category.name, &exercise.name, weight);
                }
            }
            categories.push(Category {
                name: category.name,
                kind: category.kind,
                exercises: category.exercises.into_iter().map(|e| e.name).collect(),
            });
        }

        Self::new(ExerciseCatalog::new(categories)?, table, weights)
    }

    #[must_use]
    pub fn catalog(&self) -> &ExerciseCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn table(&self) -> &NormalizationTable {
        &self.table
    }

    #[must_use]
    pub fn weights(&self) -> &ExerciseWeights {
        &self.weights
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    categories: Vec<CategoryEntry>,
}

#[derive(Deserialize)]
struct CategoryEntry {
    name: String,
    #[serde(default)]
    kind: CategoryKind,
    exercises: Vec<ExerciseEntry>,
}

#[derive(Deserialize)]
struct ExerciseEntry {
    name: String,
    weight: Option<f32>,
    maxima: BTreeMap<String, f32>,
}

/// Reference data set: two profiles, loads in kg, plank in seconds.
pub static DEFAULT: std::sync::LazyLock<ScoringConfig> = std::sync::LazyLock::new(|| {
    let categories = vec![
        Category::weighted("legs", &["front squat", "back squat", "deadlift"]),
        Category::weighted("glutes", &["hip thrust"]),
        Category::weighted("back", &["pull-up", "cable row", "lat pulldown"]),
        Category::weighted("chest", &["bench press"]),
        Category::weighted("shoulders", &["overhead press"]),
        Category::best_variant("biceps", &["machine curl", "single-arm dumbbell curl"]),
        Category::weighted("triceps", &["cable pushdown"]),
        Category::weighted("core", &["plank"]),
    ];

    let mut table = NormalizationTable::default();
    for (profile, maxima) in [("female", &FEMALE_MAXIMA), ("male", &MALE_MAXIMA)] {
        for (category, exercise, maximum) in maxima {
            table.insert(&Profile::from(profile), category, exercise, *maximum);
        }
    }

    ScoringConfig {
        catalog: ExerciseCatalog { categories },
        table,
        weights: ExerciseWeights::default(),
    }
});

const FEMALE_MAXIMA: [(&str, &str, f32); 13] = [
    ("legs", "front squat", 60.0),
    ("legs", "back squat", 80.0),
    ("legs", "deadlift", 90.0),
    ("glutes", "hip thrust", 80.0),
    ("back", "pull-up", 50.0),
    ("back", "cable row", 60.0),
    ("back", "lat pulldown", 55.0),
    ("chest", "bench press", 50.0),
    ("shoulders", "overhead press", 40.0),
    ("biceps", "machine curl", 25.0),
    ("biceps", "single-arm dumbbell curl", 20.0),
    ("triceps", "cable pushdown", 25.0),
    ("core", "plank", 90.0),
];

const MALE_MAXIMA: [(&str, &str, f32); 13] = [
    ("legs", "front squat", 120.0),
    ("legs", "back squat", 140.0),
    ("legs", "deadlift", 180.0),
    ("glutes", "hip thrust", 140.0),
    ("back", "pull-up", 70.0),
    ("back", "cable row", 90.0),
    ("back", "lat pulldown", 80.0),
    ("chest", "bench press", 100.0),
    ("shoulders", "overhead press", 70.0),
    ("biceps", "machine curl", 35.0),
    ("biceps", "single-arm dumbbell curl", 30.0),
    ("triceps", "cable pushdown", 40.0),
    ("core", "plank", 120.0),
];

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn catalog() -> ExerciseCatalog {
        ExerciseCatalog::new(vec![
            Category::weighted("legs", &["back squat", "deadlift"]),
            Category::best_variant("biceps", &["machine curl", "cable curl"]),
        ])
        .unwrap()
    }

    fn table(profiles: &[&str]) -> NormalizationTable {
        let mut table = NormalizationTable::default();
        for profile in profiles {
            let profile = Profile::from(*profile);
            table.insert(&profile, "legs", "back squat", 100.0);
            table.insert(&profile, "legs", "deadlift", 120.0);
            table.insert(&profile, "biceps", "machine curl", 30.0);
            table.insert(&profile, "biceps", "cable curl", 25.0);
        }
        table
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ScoringConfig::new(
            DEFAULT.catalog().clone(),
            DEFAULT.table().clone(),
            DEFAULT.weights().clone(),
        )
        .unwrap();
        assert_eq!(config, *DEFAULT);
        assert_eq!(
            config.table().profiles().cloned().collect::<Vec<_>>(),
            vec![Profile::from("female"), Profile::from("male")]
        );
        assert_eq!(
            config
                .catalog()
                .categories()
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>(),
            vec![
                "legs",
                "glutes",
                "back",
                "chest",
                "shoulders",
                "biceps",
                "triceps",
                "core"
            ]
        );
    }

    #[test]
    fn test_catalog_duplicates() {
        assert_eq!(
            ExerciseCatalog::new(vec![
                Category::weighted("legs", &["deadlift"]),
                Category::weighted("legs", &["back squat"]),
            ]),
            Err(ConfigError::DuplicateCategory("legs".to_string()))
        );
        assert_eq!(
            ExerciseCatalog::new(vec![Category::weighted("legs", &["deadlift", "deadlift"])]),
            Err(ConfigError::DuplicateExercise {
                category: "legs".to_string(),
                exercise: "deadlift".to_string()
            })
        );
    }

    #[test]
    fn test_catalog_category() {
        let catalog = catalog();
        assert_eq!(
            catalog.category("biceps").map(|c| c.kind),
            Some(CategoryKind::BestVariant)
        );
        assert_eq!(catalog.category("chest"), None);
    }

    #[test]
    fn test_table_maximum() {
        let table = table(&["female"]);
        let female = Profile::from("female");
        assert_eq!(table.maximum(&female, "legs", "deadlift"), Some(120.0));
        assert_eq!(table.maximum(&female, "legs", "plank"), None);
        assert_eq!(table.maximum(&Profile::from("male"), "legs", "deadlift"), None);
        assert!(table.contains_profile(&female));
    }

    #[test]
    fn test_weights_default_to_one() {
        let mut weights = ExerciseWeights::default();
        weights.insert("legs", "deadlift", 2.0);
        assert_eq!(weights.weight("legs", "deadlift"), 2.0);
        assert_eq!(weights.weight("legs", "back squat"), 1.0);
        assert_eq!(weights.weight("back", "deadlift"), 1.0);
    }

    #[test]
    fn test_config_new() {
        assert!(
            ScoringConfig::new(catalog(), table(&["female", "male"]), ExerciseWeights::default())
                .is_ok()
        );
    }

    #[test]
    fn test_config_new_without_profiles() {
        assert_eq!(
            ScoringConfig::new(
                catalog(),
                NormalizationTable::default(),
                ExerciseWeights::default()
            ),
            Err(ConfigError::NoProfiles)
        );
    }

    #[test]
    fn test_config_new_missing_maximum() {
        let mut table = table(&["female"]);
        table.insert(&Profile::from("male"), "legs", "back squat", 140.0);
        assert_eq!(
            ScoringConfig::new(catalog(), table, ExerciseWeights::default()),
            Err(ConfigError::MissingMaximum {
                profile: "male".to_string(),
                category: "legs".to_string(),
                exercise: "deadlift".to_string(),
            })
        );
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f32::INFINITY)]
    fn test_config_new_invalid_maximum(#[case] value: f32) {
        let mut table = table(&["female"]);
        table.insert(&Profile::from("female"), "legs", "deadlift", value);
        assert_eq!(
            ScoringConfig::new(catalog(), table, ExerciseWeights::default()),
            Err(ConfigError::InvalidMaximum {
                profile: "female".to_string(),
                exercise: "deadlift".to_string(),
                value,
            })
        );
    }

    #[test]
    fn test_config_new_zero_maximum() {
        let mut table = table(&["female"]);
        table.insert(&Profile::from("female"), "legs", "deadlift", 0.0);
        assert!(ScoringConfig::new(catalog(), table, ExerciseWeights::default()).is_ok());
    }

    #[rstest]
    #[case::unknown_category("arms", "deadlift", 1.0, ConfigError::UnknownCategory("arms".to_string()))]
    #[case::unknown_exercise(
        "legs",
        "plank",
        1.0,
        ConfigError::UnknownExercise { category: "legs".to_string(), exercise: "plank".to_string() }
    )]
    #[case::zero_weight(
        "legs",
        "deadlift",
        0.0,
        ConfigError::InvalidWeight { exercise: "deadlift".to_string(), value: 0.0 }
    )]
    #[case::negative_weight(
        "legs",
        "deadlift",
        -2.0,
        ConfigError::InvalidWeight { exercise: "deadlift".to_string(), value: -2.0 }
    )]
    fn test_config_new_invalid_weights(
        #[case] category: &str,
        #[case] exercise: &str,
        #[case] weight: f32,
        #[case] expected: ConfigError,
    ) {
        let mut weights = ExerciseWeights::default();
        weights.insert(category, exercise, weight);
        assert_eq!(
            ScoringConfig::new(catalog(), table(&["female"]), weights),
            Err(expected)
        );
    }

    #[test]
    fn test_config_from_json() {
        let config = ScoringConfig::from_json(
            r#"{
                "categories": [
                    {
                        "name": "legs",
                        "exercises": [
                            { "name": "back squat", "maxima": { "female": 80, "male": 140 } },
                            { "name": "deadlift", "weight": 1.5, "maxima": { "female": 90, "male": 180 } }
                        ]
                    },
                    {
                        "name": "biceps",
                        "kind": "best_variant",
                        "exercises": [
                            { "name": "machine curl", "maxima": { "female": 25, "male": 35 } }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.catalog().categories(),
            &[
                Category::weighted("legs", &["back squat", "deadlift"]),
                Category::best_variant("biceps", &["machine curl"]),
            ]
        );
        assert_eq!(
            config
                .table()
                .maximum(&Profile::from("male"), "legs", "deadlift"),
            Some(180.0)
        );
        assert_eq!(config.weights().weight("legs", "deadlift"), 1.5);
        assert_eq!(config.weights().weight("legs", "back squat"), 1.0);
    }

    #[test]
    fn test_config_from_json_missing_maximum() {
        assert_eq!(
            ScoringConfig::from_json(
                r#"{
                    "categories": [
                        {
                            "name": "core",
                            "exercises": [
                                { "name": "plank", "maxima": { "female": 90 } },
                                { "name": "side plank", "maxima": { "male": 60 } }
                            ]
                        }
                    ]
                }"#,
            ),
            Err(ConfigError::MissingMaximum {
                profile: "female".to_string(),
                category: "core".to_string(),
                exercise: "side plank".to_string(),
            })
        );
    }

    #[test]
    fn test_config_from_json_invalid_document() {
        assert!(matches!(
            ScoringConfig::from_json(r#"{ "categories": [ { "name": "core" } ] }"#),
            Err(ConfigError::Format(_))
        ));
    }
}
