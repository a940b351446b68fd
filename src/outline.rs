//! Lesson outline to phase windows.
//!
//! An outline is the hierarchical lesson structure produced upstream: a root
//! whose children are top-level sections, some with time-stamped subsections.

use serde::{Deserialize, Serialize};

use crate::models::{Phase, Question};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn leaf(content: impl Into<String>, begin_time: f64) -> Self {
        Self {
            content: content.into(),
            begin_time: Some(begin_time),
            child: Vec::new(),
        }
    }

    pub fn section(content: impl Into<String>, begin_time: Option<f64>, child: Vec<OutlineNode>) -> Self {
        Self {
            content: content.into(),
            begin_time,
            child,
        }
    }
}

/// Named phase starts, in outline order.
///
/// Each top-level section contributes its time-stamped subsections when it has
/// any, otherwise itself. A section without a begin time yields `None`.
pub fn extract_phase_starts(root: &OutlineNode) -> Vec<(String, Option<f64>)> {
    let mut starts = Vec::new();

    for section in &root.child {
        let timed: Vec<&OutlineNode> = section
            .child
            .iter()
            .filter(|sub| sub.begin_time.is_some())
            .collect();

        if timed.is_empty() {
            starts.push((section.content.clone(), section.begin_time));
        } else {
            starts.extend(
                timed
                    .into_iter()
                    .map(|sub| (sub.content.clone(), sub.begin_time)),
            );
        }
    }

    starts
}

/// Close the phase starts into contiguous, non-overlapping windows.
///
/// A timed phase ends where the next timed phase begins; the last one ends at
/// the latest question end. Windows are half-open, so a final question with no
/// `endTime` sits on the last window's end and is left out of it.
///
/// No window starts before the previous one ends. An untimed phase gets an
/// empty window at the previous window's end, so it is reported as skipped
/// instead of claiming questions that belong to its neighbours.
pub fn phase_windows(root: &OutlineNode, questions: &[Question]) -> Vec<Phase> {
    let starts = extract_phase_starts(root);
    let lesson_end = questions
        .iter()
        .map(Question::effective_end)
        .fold(None, |acc: Option<f64>, end| Some(acc.map_or(end, |a| a.max(end))));

    let mut cursor = 0.0;
    starts
        .iter()
        .enumerate()
        .map(|(i, (content, begin_time))| {
            let begin = begin_time.map_or(cursor, |t| t.max(cursor));
            let next_timed = starts[i + 1..].iter().find_map(|(_, t)| *t);
            let end = match (begin_time, next_timed) {
                (None, _) => begin,
                (Some(_), Some(next)) => next,
                (Some(_), None) => lesson_end.unwrap_or(begin),
            }
            .max(begin);
            cursor = end;
            Phase::new(content.clone(), begin, end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline() -> OutlineNode {
        OutlineNode::section(
            "勾股定理",
            None,
            vec![
                OutlineNode::leaf("一、回顾与引入新课", 0.0),
                OutlineNode::section(
                    "二、直角三角形性质探究",
                    Some(120.0),
                    vec![
                        OutlineNode::leaf("1.直角三角形边角关系总结", 130.0),
                        OutlineNode::section("（无时间）", None, Vec::new()),
                        OutlineNode::leaf("2.勾股定理证明", 600.0),
                    ],
                ),
                OutlineNode::section(
                    "三、勾股定理应用练习",
                    Some(1200.0),
                    vec![OutlineNode::section("例题", None, Vec::new())],
                ),
                OutlineNode::section("四、课堂知识回顾与总结", None, Vec::new()),
            ],
        )
    }

    #[test]
    fn timed_subsections_replace_their_section() {
        let starts = extract_phase_starts(&outline());
        assert_eq!(
            starts,
            vec![
                ("一、回顾与引入新课".to_string(), Some(0.0)),
                ("1.直角三角形边角关系总结".to_string(), Some(130.0)),
                ("2.勾股定理证明".to_string(), Some(600.0)),
                ("三、勾股定理应用练习".to_string(), Some(1200.0)),
                ("四、课堂知识回顾与总结".to_string(), None),
            ]
        );
    }

    #[test]
    fn windows_chain_end_to_next_begin() {
        let questions = vec![
            Question::new("a", 10.0),
            Question::new("b", 2000.0).ending_at(2100.0),
        ];
        let root = OutlineNode::section(
            "root",
            None,
            vec![OutlineNode::leaf("A", 0.0), OutlineNode::leaf("B", 900.0)],
        );

        let windows = phase_windows(&root, &questions);
        assert_eq!(
            windows,
            vec![Phase::new("A", 0.0, 900.0), Phase::new("B", 900.0, 2100.0)]
        );
    }

    #[test]
    fn parses_outline_json() {
        let root: OutlineNode = serde_json::from_str(
            r#"{ "content": "root", "child": [ { "content": "导入", "beginTime": 3 }, { "content": "练习" } ] }"#,
        )
        .unwrap();
        assert_eq!(
            extract_phase_starts(&root),
            vec![("导入".to_string(), Some(3.0)), ("练习".to_string(), None)]
        );
    }

    #[test]
    fn untimed_sections_get_empty_windows_after_their_predecessor() {
        let questions = vec![Question::new("a", 10.0), Question::new("b", 1500.0)];
        let windows = phase_windows(&outline(), &questions);
        assert_eq!(
            windows,
            vec![
                Phase::new("一、回顾与引入新课", 0.0, 130.0),
                Phase::new("1.直角三角形边角关系总结", 130.0, 600.0),
                Phase::new("2.勾股定理证明", 600.0, 1200.0),
                Phase::new("三、勾股定理应用练习", 1200.0, 1500.0),
                Phase::new("四、课堂知识回顾与总结", 1500.0, 1500.0),
            ]
        );
    }

    #[test]
    fn untimed_middle_section_does_not_steal_its_neighbours_window() {
        let questions = vec![Question::new("a", 10.0).ending_at(300.0)];
        let root = OutlineNode::section(
            "root",
            None,
            vec![
                OutlineNode::leaf("A", 0.0),
                OutlineNode::section("X", None, Vec::new()),
                OutlineNode::leaf("B", 100.0),
            ],
        );
        assert_eq!(
            phase_windows(&root, &questions),
            vec![
                Phase::new("A", 0.0, 100.0),
                Phase::new("X", 100.0, 100.0),
                Phase::new("B", 100.0, 300.0),
            ]
        );
    }

    #[test]
    fn out_of_order_starts_never_overlap_or_invert() {
        let questions = vec![Question::new("a", 500.0)];
        let root = OutlineNode::section(
            "root",
            None,
            vec![
                OutlineNode::leaf("A", 0.0),
                OutlineNode::leaf("B", 200.0),
                OutlineNode::leaf("C", 100.0),
            ],
        );
        let windows = phase_windows(&root, &questions);
        assert_eq!(
            windows,
            vec![
                Phase::new("A", 0.0, 200.0),
                Phase::new("B", 200.0, 200.0),
                Phase::new("C", 200.0, 500.0),
            ]
        );
        for pair in windows.windows(2) {
            assert!(pair[0].end_time <= pair[1].begin_time);
        }
    }

    #[test]
    fn final_question_without_end_falls_outside_last_window() {
        let questions = vec![Question::new("a", 10.0), Question::new("b", 90.0)];
        let root = OutlineNode::section("root", None, vec![OutlineNode::leaf("A", 0.0)]);
        let windows = phase_windows(&root, &questions);
        assert_eq!(windows, vec![Phase::new("A", 0.0, 90.0)]);
        assert!(windows[0].contains(10.0));
        assert!(!windows[0].contains(90.0));
    }
}
