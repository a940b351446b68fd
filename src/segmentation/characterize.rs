use crate::models::{
    BloomProgression, ChainedQuestion, Characteristics, CognitiveLevel, ProgressionPattern,
    SentimentClass,
};
use crate::segmentation::config::{ChainConfig, CharacterizationConfig, ProgressionRule};
use crate::segmentation::weights::WeightTables;

/// Aggregate metrics for a finished chain spanning `duration` seconds.
pub fn characterize(
    questions: &[ChainedQuestion],
    duration: f64,
    config: &ChainConfig,
) -> Characteristics {
    let settings = &config.characterization;
    let count = questions.len().max(1) as f64;

    let has_answers = questions.iter().any(|q| q.question.answered);
    let has_feedback = questions
        .iter()
        .any(|q| q.question.has_feedback(&settings.no_feedback_tag));

    let avg_sentiment = questions
        .iter()
        .map(|q| q.question.sentiment_score())
        .sum::<f64>()
        / count;

    let bloom_progression = analyze_progression(
        questions.iter().map(|q| q.question.cognitive_level),
        &config.weights,
        &settings.progression_rule,
    );

    // Only the phase variant scores questions; all or none carry a score.
    let avg_value_score = questions
        .iter()
        .map(|q| q.value_score)
        .collect::<Option<Vec<f64>>>()
        .filter(|scores| !scores.is_empty())
        .map(|scores| scores.iter().sum::<f64>() / scores.len() as f64);

    Characteristics {
        has_answers,
        has_feedback,
        avg_sentiment,
        sentiment_classification: classify_sentiment(avg_sentiment, settings),
        bloom_progression,
        intensity: questions.len() as f64 / (duration / 60.0).max(1.0),
        avg_value_score,
    }
}

/// Above `positive_above` is positive, below `negative_below` negative, the
/// closed range between is neutral.
pub fn classify_sentiment(avg: f64, settings: &CharacterizationConfig) -> SentimentClass {
    if avg > settings.positive_above {
        SentimentClass::Positive
    } else if avg < settings.negative_below {
        SentimentClass::Negative
    } else {
        SentimentClass::Neutral
    }
}

/// Count level changes between consecutive questions and name the trend.
pub fn analyze_progression(
    levels: impl IntoIterator<Item = CognitiveLevel>,
    weights: &WeightTables,
    rule: &ProgressionRule,
) -> BloomProgression {
    let sequence: Vec<u32> = levels
        .into_iter()
        .map(|level| weights.cognitive_weight(level))
        .collect();

    let (mut ascending, mut descending, mut stable) = (0usize, 0usize, 0usize);
    for pair in sequence.windows(2) {
        match pair[1].cmp(&pair[0]) {
            std::cmp::Ordering::Greater => ascending += 1,
            std::cmp::Ordering::Less => descending += 1,
            std::cmp::Ordering::Equal => stable += 1,
        }
    }

    let total = ascending + descending + stable;
    let progression_ratio = if total > 0 {
        ascending as f64 / total as f64
    } else {
        0.0
    };

    let pattern = match rule {
        ProgressionRule::Majority => {
            if ascending > descending {
                ProgressionPattern::Progressive
            } else if descending > ascending {
                ProgressionPattern::Regressive
            } else {
                ProgressionPattern::Stable
            }
        }
        ProgressionRule::Ratio {
            progressive_above,
            regressive_above,
        } => {
            if progression_ratio > *progressive_above {
                ProgressionPattern::Progressive
            } else if descending > ascending
                && descending as f64 / total as f64 > *regressive_above
            {
                ProgressionPattern::Regressive
            } else {
                ProgressionPattern::Stable
            }
        }
    };

    BloomProgression {
        pattern,
        ascending,
        descending,
        stable,
        progression_ratio,
    }
}
