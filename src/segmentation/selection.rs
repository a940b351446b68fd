use std::collections::HashSet;

use crate::models::Question;
use crate::segmentation::config::ChainConfig;

/// A candidate question paired with its value score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredQuestion {
    pub question: Question,
    pub score: f64,
}

/// Weighted sum of cognitive level, question type, text length and the
/// answered bonus, rounded to two decimals.
pub fn value_score(question: &Question, config: &ChainConfig) -> f64 {
    let w = &config.value;
    let cognitive = config.weights.cognitive_weight(question.cognitive_level) as f64;
    let question_type = config.weights.question_type_score(question.topic) as f64;
    let length = (question.text_len() as f64 / w.length_divisor).min(w.length_cap);
    let answered = if question.answered { 1.0 } else { 0.0 };

    let score = cognitive * w.cognitive
        + question_type * w.question_type
        + length * w.length
        + answered * w.answered;

    (score * 100.0).round() / 100.0
}

/// Pick a bounded, diverse subset of `candidates`, returned in time order.
///
/// Walks candidates from highest to lowest score and keeps one while the
/// minimum is unmet, when it brings a new cognitive level or topic, or when
/// its score is high on its own. Stops at `max_count`. `min_count` is soft:
/// phases with fewer candidates keep all of them.
pub fn select_high_value(candidates: Vec<Question>, config: &ChainConfig) -> Vec<ScoredQuestion> {
    let limits = &config.selection;

    let mut ranked: Vec<ScoredQuestion> = candidates
        .into_iter()
        .map(|question| ScoredQuestion {
            score: value_score(&question, config),
            question,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<usize> = Vec::new();
    let mut seen_levels = HashSet::new();
    let mut seen_topics = HashSet::new();

    for (idx, candidate) in ranked.iter().enumerate() {
        if kept.len() >= limits.max_count {
            break;
        }

        let q = &candidate.question;
        let include = kept.len() < limits.min_count
            || !seen_levels.contains(&q.cognitive_level)
            || !seen_topics.contains(&q.topic)
            || candidate.score > limits.high_value_score;

        if include {
            kept.push(idx);
            seen_levels.insert(q.cognitive_level);
            seen_topics.insert(q.topic);
        }
    }

    // The pass above admits everything below `min_count`, so this only runs
    // when every candidate is already kept. It guards the minimum should the
    // keep rule ever tighten.
    if kept.len() < limits.min_count {
        for (idx, candidate) in ranked.iter().enumerate() {
            if kept.len() >= limits.min_count {
                break;
            }
            let duplicate = kept
                .iter()
                .any(|&k| ranked[k].question.begin_time == candidate.question.begin_time);
            if !duplicate {
                kept.push(idx);
            }
        }
    }

    let mut taken = vec![false; ranked.len()];
    for idx in kept {
        taken[idx] = true;
    }
    let mut selected: Vec<ScoredQuestion> = ranked
        .into_iter()
        .zip(taken)
        .filter_map(|(candidate, keep)| keep.then_some(candidate))
        .collect();
    selected.sort_by(|a, b| a.question.begin_time.total_cmp(&b.question.begin_time));
    selected
}
