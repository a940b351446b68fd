use crate::models::{
    Chain, ChainedQuestion, CognitiveLevel, Question, RawQuestion, Timeline, TopicCategory,
};
use crate::segmentation::boundary::{BoundaryPolicy, ThresholdPolicy};
use crate::segmentation::characterize::characterize;
use crate::segmentation::config::ChainConfig;
use crate::segmentation::weights::WeightTables;
use crate::{log_debug, log_info};

const ENABLE_LOGS: bool = true;

/// Validate raw records, dropping those without text or begin time.
pub fn ingest(raw: Vec<RawQuestion>) -> Vec<Question> {
    let total = raw.len();
    let questions: Vec<Question> = raw.into_iter().filter_map(Question::from_raw).collect();
    let dropped = total - questions.len();
    if dropped > 0 {
        log_info!("Dropped {} of {} question records missing text or beginTime", dropped, total);
    }
    log_debug!("Kept {} valid questions", questions.len());
    questions
}

/// Stable ascending sort by begin time; ties keep input order.
pub fn sort_by_begin_time(questions: &mut [Question]) {
    questions.sort_by(|a, b| a.begin_time.total_cmp(&b.begin_time));
}

/// An open chain accumulating questions until the builder closes it.
#[derive(Debug, Clone)]
pub struct ChainDraft {
    id: u32,
    questions: Vec<ChainedQuestion>,
    start_time: f64,
    end_time: f64,
    /// Topic occurrence counts in first-seen order.
    topic_tally: Vec<(TopicCategory, usize)>,
    primary_topic: TopicCategory,
    primary_cognitive_level: CognitiveLevel,
}

impl ChainDraft {
    /// Open an empty chain anchored at `first`; the caller still pushes it.
    pub fn open(id: u32, first: &Question) -> Self {
        Self {
            id,
            questions: Vec::new(),
            start_time: first.begin_time,
            end_time: first.effective_end(),
            topic_tally: Vec::new(),
            primary_topic: first.topic,
            primary_cognitive_level: first.cognitive_level,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn primary_topic(&self) -> TopicCategory {
        self.primary_topic
    }

    pub fn primary_cognitive_level(&self) -> CognitiveLevel {
        self.primary_cognitive_level
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn last_question(&self) -> Option<&Question> {
        self.questions.last().map(|q| &q.question)
    }

    pub fn push(&mut self, question: Question, value_score: Option<f64>, weights: &WeightTables) {
        self.end_time = self.end_time.max(question.effective_end());

        match self.topic_tally.iter_mut().find(|(t, _)| *t == question.topic) {
            Some((_, count)) => *count += 1,
            None => self.topic_tally.push((question.topic, 1)),
        }
        self.primary_topic = most_frequent_topic(&self.topic_tally).unwrap_or(question.topic);

        // Highest weight seen so far; earlier labels win ties.
        if weights.cognitive_weight(question.cognitive_level)
            > weights.cognitive_weight(self.primary_cognitive_level)
        {
            self.primary_cognitive_level = question.cognitive_level;
        }

        let chain_index = self.questions.len();
        let relative_time = question.begin_time - self.start_time;
        self.questions.push(ChainedQuestion {
            question,
            chain_index,
            relative_time,
            value_score,
        });
    }

    fn finalize(self, phase: Option<&PhaseLabel>, config: &ChainConfig) -> Chain {
        let duration = self.end_time - self.start_time;
        let characteristics = characterize(&self.questions, duration, config);

        Chain {
            id: self.id,
            teaching_phase: phase.map(|p| p.teaching_phase.clone()),
            core_question: phase.map(|p| p.core_question.clone()),
            question_count: self.questions.len(),
            questions: self.questions,
            start_time: self.start_time,
            end_time: self.end_time,
            primary_topic: self.primary_topic,
            primary_cognitive_level: self.primary_cognitive_level,
            duration,
            characteristics,
            timeline: Timeline::new(self.start_time, self.end_time),
        }
    }
}

/// First topic reaching the highest count.
fn most_frequent_topic(tally: &[(TopicCategory, usize)]) -> Option<TopicCategory> {
    tally
        .iter()
        .fold(None, |best: Option<(TopicCategory, usize)>, &(topic, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((topic, count)),
        })
        .map(|(topic, _)| topic)
}

#[derive(Debug, Clone)]
struct PhaseLabel {
    teaching_phase: String,
    core_question: String,
}

/// Streams time-ordered questions into chains.
///
/// The open chain is the builder's only mutable state; a closed chain is
/// characterized once and never touched again.
pub struct ChainBuilder<'a, P: BoundaryPolicy> {
    config: &'a ChainConfig,
    policy: P,
    next_id: u32,
    phase: Option<PhaseLabel>,
    open: Option<ChainDraft>,
    chains: Vec<Chain>,
}

impl<'a, P: BoundaryPolicy> ChainBuilder<'a, P> {
    pub fn new(config: &'a ChainConfig, policy: P) -> Self {
        Self {
            config,
            policy,
            next_id: 1,
            phase: None,
            open: None,
            chains: Vec::new(),
        }
    }

    /// Continue id numbering from an earlier builder.
    pub fn starting_at(mut self, first_id: u32) -> Self {
        self.next_id = first_id;
        self
    }

    /// Tag every chain this builder emits with a teaching phase.
    pub fn for_phase(mut self, teaching_phase: &str) -> Self {
        self.phase = Some(PhaseLabel {
            teaching_phase: teaching_phase.to_string(),
            core_question: self.config.core_question_for(teaching_phase),
        });
        self
    }

    /// Id the next opened chain will receive.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn push(&mut self, question: Question) {
        self.push_scored(question, None);
    }

    /// Questions must arrive in ascending begin-time order.
    pub fn push_scored(&mut self, question: Question, value_score: Option<f64>) {
        let active = self.open.as_ref();
        let previous = active.and_then(ChainDraft::last_question);
        let start_new = self.policy.should_start_new_chain(&question, active, previous);

        if start_new || self.open.is_none() {
            self.close_open_chain();
            self.open = Some(ChainDraft::open(self.next_id, &question));
            self.next_id += 1;
        }

        if let Some(draft) = self.open.as_mut() {
            draft.push(question, value_score, &self.config.weights);
        }
    }

    fn close_open_chain(&mut self) {
        if let Some(draft) = self.open.take() {
            log_debug!(
                "Closing chain {} with {} questions ({}s - {}s)",
                draft.id(),
                draft.len(),
                draft.start_time(),
                draft.end_time()
            );
            self.chains.push(draft.finalize(self.phase.as_ref(), self.config));
        }
    }

    pub fn finish(mut self) -> Vec<Chain> {
        self.close_open_chain();
        self.chains
    }
}

/// Flat, time-based segmentation of questions already sorted by begin time.
pub fn build_chains(questions: Vec<Question>, config: &ChainConfig) -> Vec<Chain> {
    let mut builder = ChainBuilder::new(config, ThresholdPolicy::from_config(config));
    for question in questions {
        builder.push(question);
    }
    let chains = builder.finish();
    log_info!("Built {} question chains", chains.len());
    chains
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(begin: f64, topic: TopicCategory, level: CognitiveLevel) -> Question {
        Question::new(format!("问题{begin}"), begin)
            .with_topic(topic)
            .with_level(level)
    }

    #[test]
    fn gap_over_a_minute_starts_new_chain() {
        let config = ChainConfig::default();
        let questions = vec![
            q(0.0, TopicCategory::What, CognitiveLevel::Remember),
            q(10.0, TopicCategory::What, CognitiveLevel::Remember),
            q(90.0, TopicCategory::What, CognitiveLevel::Remember),
        ];

        let chains = build_chains(questions, &config);
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].question_count, 2);
        assert_eq!(chains[1].question_count, 1);
        assert_eq!(chains[0].id, 1);
        assert_eq!(chains[1].id, 2);
        assert_eq!(chains[1].start_time, 90.0);
    }

    #[test]
    fn topic_change_splits_only_after_thirty_seconds() {
        let config = ChainConfig::default();
        let far = vec![
            q(0.0, TopicCategory::What, CognitiveLevel::Understand),
            q(40.0, TopicCategory::How, CognitiveLevel::Understand),
        ];
        let near = vec![
            q(0.0, TopicCategory::What, CognitiveLevel::Understand),
            q(20.0, TopicCategory::How, CognitiveLevel::Understand),
        ];

        assert_eq!(build_chains(far, &config).len(), 2);
        assert_eq!(build_chains(near, &config).len(), 1);
    }

    #[test]
    fn regression_from_create_to_remember_splits_after_pause() {
        let config = ChainConfig::default();
        let paused = vec![
            q(0.0, TopicCategory::How, CognitiveLevel::Create),
            q(25.0, TopicCategory::How, CognitiveLevel::Remember),
        ];
        let quick = vec![
            q(0.0, TopicCategory::How, CognitiveLevel::Create),
            q(10.0, TopicCategory::How, CognitiveLevel::Remember),
        ];

        assert_eq!(build_chains(paused, &config).len(), 2);
        assert_eq!(build_chains(quick, &config).len(), 1);
    }

    #[test]
    fn questions_are_stamped_with_index_and_relative_time() {
        let config = ChainConfig::default();
        let questions = vec![
            q(100.0, TopicCategory::What, CognitiveLevel::Remember).ending_at(104.0),
            q(110.0, TopicCategory::What, CognitiveLevel::Remember).ending_at(130.0),
            q(115.0, TopicCategory::What, CognitiveLevel::Remember).ending_at(120.0),
        ];

        let chains = build_chains(questions, &config);
        let chain = &chains[0];
        let stamps: Vec<(usize, f64)> = chain
            .questions
            .iter()
            .map(|q| (q.chain_index, q.relative_time))
            .collect();
        assert_eq!(stamps, vec![(0, 0.0), (1, 10.0), (2, 15.0)]);
        assert_eq!(chain.end_time, 130.0);
        assert_eq!(chain.duration, 30.0);
        assert_eq!(chain.timeline.start_minute, 1);
        assert_eq!(chain.timeline.end_minute, 2);
    }

    #[test]
    fn primary_topic_is_most_frequent_first_seen_on_ties() {
        let weights = WeightTables::default();
        let first = q(0.0, TopicCategory::How, CognitiveLevel::Remember);
        let mut draft = ChainDraft::open(1, &first);
        draft.push(first, None, &weights);
        draft.push(q(1.0, TopicCategory::Why, CognitiveLevel::Remember), None, &weights);
        assert_eq!(draft.primary_topic(), TopicCategory::How);

        draft.push(q(2.0, TopicCategory::Why, CognitiveLevel::Remember), None, &weights);
        assert_eq!(draft.primary_topic(), TopicCategory::Why);
    }

    #[test]
    fn primary_level_is_highest_weight_seen_not_most_frequent() {
        let weights = WeightTables::default();
        let first = q(0.0, TopicCategory::What, CognitiveLevel::Remember);
        let mut draft = ChainDraft::open(1, &first);
        draft.push(first, None, &weights);
        draft.push(q(1.0, TopicCategory::What, CognitiveLevel::Analyze), None, &weights);
        draft.push(q(2.0, TopicCategory::What, CognitiveLevel::Remember), None, &weights);
        draft.push(q(3.0, TopicCategory::What, CognitiveLevel::Remember), None, &weights);
        assert_eq!(draft.primary_cognitive_level(), CognitiveLevel::Analyze);
    }

    #[test]
    fn unknown_level_never_displaces_a_known_one() {
        let weights = WeightTables::default();
        let first = q(0.0, TopicCategory::What, CognitiveLevel::Other);
        let mut draft = ChainDraft::open(1, &first);
        draft.push(first, None, &weights);
        assert_eq!(draft.primary_cognitive_level(), CognitiveLevel::Other);
        draft.push(q(1.0, TopicCategory::What, CognitiveLevel::Remember), None, &weights);
        draft.push(q(2.0, TopicCategory::What, CognitiveLevel::Other), None, &weights);
        assert_eq!(draft.primary_cognitive_level(), CognitiveLevel::Remember);
    }

    #[test]
    fn sort_is_stable_for_equal_begin_times() {
        let mut questions = vec![
            Question::new("b", 5.0),
            Question::new("a", 1.0),
            Question::new("c", 5.0),
        ];
        sort_by_begin_time(&mut questions);
        let order: Vec<&str> = questions.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn builder_continues_ids_across_runs() {
        let config = ChainConfig::default();
        let mut builder = ChainBuilder::new(&config, ThresholdPolicy::from_config(&config))
            .starting_at(5);
        builder.push(Question::new("x", 0.0));
        builder.push(Question::new("y", 500.0));
        assert_eq!(builder.next_id(), 7);
        let ids: Vec<u32> = builder.finish().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![5, 6]);
    }
}
