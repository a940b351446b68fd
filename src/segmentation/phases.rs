use crate::models::{Chain, Phase, Question};
use crate::segmentation::algorithm::ChainBuilder;
use crate::segmentation::boundary::WholeWindowPolicy;
use crate::segmentation::config::ChainConfig;
use crate::segmentation::selection::select_high_value;
use crate::{log_debug, log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// Chains built per phase, plus the phases that yielded none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseChains {
    pub chains: Vec<Chain>,
    pub skipped: Vec<Phase>,
}

/// Build at most one chain per phase from the value-selected questions that
/// begin inside the phase window.
///
/// `questions` must already be sorted by begin time. Phases without a
/// matching question are reported in `skipped` instead of failing the run.
pub fn build_phase_chains(
    questions: &[Question],
    phases: &[Phase],
    config: &ChainConfig,
) -> PhaseChains {
    let mut result = PhaseChains::default();
    let mut next_id = 1;

    for phase in phases {
        let candidates: Vec<Question> = questions
            .iter()
            .filter(|q| phase.contains(q.begin_time))
            .cloned()
            .collect();

        if candidates.is_empty() {
            log_warn!(
                "Skipping phase \"{}\" ({}s - {}s): no questions",
                phase.content,
                phase.begin_time,
                phase.end_time
            );
            result.skipped.push(phase.clone());
            continue;
        }

        let candidate_count = candidates.len();
        let selected = select_high_value(candidates, config);
        log_debug!(
            "Phase \"{}\": kept {} of {} questions",
            phase.content,
            selected.len(),
            candidate_count
        );

        let mut builder = ChainBuilder::new(config, WholeWindowPolicy)
            .starting_at(next_id)
            .for_phase(&phase.content);
        for scored in selected {
            builder.push_scored(scored.question, Some(scored.score));
        }
        next_id = builder.next_id();
        result.chains.extend(builder.finish());
    }

    log_info!(
        "Built {} phase chains, skipped {} phases",
        result.chains.len(),
        result.skipped.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CognitiveLevel, TopicCategory};

    fn lesson() -> Vec<Question> {
        vec![
            Question::new("什么是直角三角形？", 5.0).with_topic(TopicCategory::What),
            Question::new("它有什么特殊性质？", 20.0)
                .with_topic(TopicCategory::What)
                .with_level(CognitiveLevel::Understand),
            Question::new("为什么斜边最长？", 130.0)
                .ending_at(150.0)
                .with_topic(TopicCategory::Why)
                .with_level(CognitiveLevel::Analyze),
            Question::new("如何证明？", 400.0)
                .with_topic(TopicCategory::How)
                .with_level(CognitiveLevel::Create),
        ]
    }

    #[test]
    fn one_chain_per_phase_regardless_of_gaps() {
        let config = ChainConfig::default();
        let phases = vec![
            Phase::new("一、回顾与引入新课", 0.0, 100.0),
            Phase::new("二、直角三角形性质探究", 100.0, 500.0),
        ];

        let result = build_phase_chains(&lesson(), &phases, &config);
        assert!(result.skipped.is_empty());
        assert_eq!(result.chains.len(), 2);

        let second = &result.chains[1];
        assert_eq!(second.id, 2);
        assert_eq!(second.question_count, 2);
        assert_eq!(second.teaching_phase.as_deref(), Some("二、直角三角形性质探究"));
        assert_eq!(
            second.core_question.as_deref(),
            Some("直角三角形的边角关系有什么规律？")
        );
        assert_eq!(second.start_time, 130.0);
        assert_eq!(second.end_time, 400.0);
        assert_eq!(second.questions[1].relative_time, 270.0);
        assert!(second.questions.iter().all(|q| q.value_score.is_some()));
        assert!(second.characteristics.avg_value_score.is_some());
    }

    #[test]
    fn empty_phase_is_skipped_and_ids_stay_dense() {
        let config = ChainConfig::default();
        let phases = vec![
            Phase::new("开场", 0.0, 100.0),
            Phase::new("空白环节", 200.0, 300.0),
            Phase::new("收尾", 300.0, 500.0),
        ];

        let result = build_phase_chains(&lesson(), &phases, &config);
        assert_eq!(result.skipped, vec![Phase::new("空白环节", 200.0, 300.0)]);
        let ids: Vec<u32> = result.chains.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(
            result.chains[0].core_question.as_deref(),
            Some("开场的核心问题是什么？")
        );
    }

    #[test]
    fn window_end_is_exclusive() {
        let config = ChainConfig::default();
        let phases = vec![Phase::new("前半", 0.0, 130.0)];
        let result = build_phase_chains(&lesson(), &phases, &config);
        assert_eq!(result.chains[0].question_count, 2);
    }
}
