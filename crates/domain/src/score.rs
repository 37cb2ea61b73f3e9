use std::f32::consts::PI;

use derive_more::{Deref, Into};
use indexmap::IndexMap;
use log::debug;

use crate::{
    Category, CategoryKind, Profile, ReadError, ScoreError, ScoringConfig, SessionRecord,
    SessionRecordService, User,
};

#[allow(async_fn_in_trait)]
pub trait ScoreService: SessionRecordService {
    fn scoring_config(&self) -> &ScoringConfig;

    fn category_scores(
        &self,
        history: &[SessionRecord],
        profile: &Profile,
    ) -> Result<CategoryScores, ScoreError> {
        compute_category_scores(self.scoring_config(), history, profile)
    }

    fn radar_series(
        &self,
        history: &[SessionRecord],
        profile: &Profile,
    ) -> Result<RadarSeries, ScoreError> {
        compute_radar_series(self.scoring_config(), history, profile)
    }

    async fn get_user_category_scores(&self, user: &User) -> Result<CategoryScores, ReadError> {
        let history = self.get_session_records(user.id).await?;
        self.category_scores(&history, &user.profile())
            .map_err(|err| ReadError::Other(err.into()))
    }
}

pub const MAX_SCORE: f32 = 10.0;

/// Normalized fitness score of a muscle-group category.
#[derive(Deref, Into, Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Score(f32);

impl From<f32> for Score {
    fn from(value: f32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}/10", self.0)
    }
}

/// Category scores in catalog order.
pub type CategoryScores = IndexMap<String, Score>;

/// Values of a radar chart. The first point is repeated at the end so the
/// polygon is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarSeries {
    pub labels: Vec<String>,
    pub values: Vec<f32>,
    /// Polar angle of each point in radians.
    pub angles: Vec<f32>,
}

impl From<&CategoryScores> for RadarSeries {
    fn from(scores: &CategoryScores) -> Self {
        let mut labels = scores.keys().cloned().collect::<Vec<_>>();
        let mut values = scores.values().map(|s| s.0).collect::<Vec<_>>();
        #[allow(clippy::cast_precision_loss)]
        let mut angles = (0..labels.len())
            .map(|i| i as f32 / labels.len() as f32 * 2.0 * PI)
            .collect::<Vec<_>>();

        if let (Some(label), Some(value), Some(angle)) =
            (labels.first(), values.first(), angles.first())
        {
            labels.push(label.clone());
            values.push(*value);
            angles.push(*angle);
        }

        Self {
            labels,
            values,
            angles,
        }
    }
}

/// Most recent usable value of `exercise` in `history`, 0 if there is none.
///
/// Recency follows the order of `history`, not the record dates.
#[must_use]
pub fn last_value(history: &[SessionRecord], exercise: &str) -> f32 {
    history
        .iter()
        .rev()
        .map(|r| r.amount(exercise))
        .find(|v| *v > 0.0)
        .unwrap_or(0.0)
}

pub fn category_score(
    config: &ScoringConfig,
    history: &[SessionRecord],
    category: &str,
    profile: &Profile,
) -> Result<Score, ScoreError> {
    if !config.table().contains_profile(profile) {
        return Err(ScoreError::UnknownProfile(profile.to_string()));
    }
    let Some(category) = config.catalog().category(category) else {
        return Err(ScoreError::UnknownCategory(category.to_string()));
    };
    Ok(reduce(config, history, category, profile))
}

pub fn compute_category_scores(
    config: &ScoringConfig,
    history: &[SessionRecord],
    profile: &Profile,
) -> Result<CategoryScores, ScoreError> {
    if !config.table().contains_profile(profile) {
        return Err(ScoreError::UnknownProfile(profile.to_string()));
    }
    debug!(
        "scoring {} session records for profile {profile}",
        history.len()
    );
    Ok(config
        .catalog()
        .categories()
        .iter()
        .map(|c| (c.name.clone(), reduce(config, history, c, profile)))
        .collect())
}

pub fn compute_radar_series(
    config: &ScoringConfig,
    history: &[SessionRecord],
    profile: &Profile,
) -> Result<RadarSeries, ScoreError> {
    Ok(RadarSeries::from(&compute_category_scores(
        config, history, profile,
    )?))
}

fn reduce(
    config: &ScoringConfig,
    history: &[SessionRecord],
    category: &Category,
    profile: &Profile,
) -> Score {
    match category.kind {
        CategoryKind::Weighted => weighted_score(config, history, category, profile),
        CategoryKind::BestVariant => best_variant_score(config, history, category, profile),
    }
}

fn reference_maximum(
    config: &ScoringConfig,
    category: &Category,
    exercise: &str,
    profile: &Profile,
) -> Option<f32> {
    match config.table().maximum(profile, &category.name, exercise) {
        Some(maximum) if maximum > 0.0 => Some(maximum),
        _ => {
            debug!(
                "no usable reference maximum for {exercise} in {} of profile {profile}",
                category.name
            );
            None
        }
    }
}

fn weighted_score(
    config: &ScoringConfig,
    history: &[SessionRecord],
    category: &Category,
    profile: &Profile,
) -> Score {
    let mut total = 0.0;
    let mut total_weight = 0.0;

    for exercise in &category.exercises {
        let value = last_value(history, exercise);
        if value == 0.0 {
            continue;
        }
        let Some(maximum) = reference_maximum(config, category, exercise, profile) else {
            continue;
        };
        let weight = config.weights().weight(&category.name, exercise);
        total += value / maximum * MAX_SCORE * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        Score((total / total_weight).min(MAX_SCORE))
    } else {
        Score(0.0)
    }
}

/// Score of the variant with the highest last value. Unlike the weighted
/// path, the result is not capped at [`MAX_SCORE`].
fn best_variant_score(
    config: &ScoringConfig,
    history: &[SessionRecord],
    category: &Category,
    profile: &Profile,
) -> Score {
    let best = category
        .exercises
        .iter()
        .map(|e| (last_value(history, e), e))
        .filter(|(value, _)| *value > 0.0)
        .filter_map(|(value, e)| {
            reference_maximum(config, category, e, profile).map(|maximum| (value, maximum))
        })
        .fold(None, |best: Option<(f32, f32)>, (value, maximum)| match best {
            Some((best_value, _)) if best_value >= value => best,
            _ => Some((value, maximum)),
        });

    best.map_or(Score(0.0), |(value, maximum)| {
        Score(value / maximum * MAX_SCORE)
    })
}
