//! Consistency checks between declared totals and extracted marks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::Paper;

/// What a declared total refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalScope {
    /// One top-level question and its sub-parts
    Question(u32),
    /// The whole paper
    Paper,
}

/// A declared total that disagrees with the extracted marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkDiscrepancy {
    pub scope: TotalScope,
    /// Value printed on the paper
    pub declared: u32,
    /// Sum of marks found on records
    pub extracted: u32,
}

impl fmt::Display for MarkDiscrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            TotalScope::Question(n) => write!(
                f,
                "Question {}: declared {} marks, found {}",
                n, self.declared, self.extracted
            ),
            TotalScope::Paper => write!(
                f,
                "Paper: declared {} marks, found {}",
                self.declared, self.extracted
            ),
        }
    }
}

/// Sum of marks per top-level question number.
pub fn marks_by_question(paper: &Paper) -> BTreeMap<u32, u32> {
    let mut sums = BTreeMap::new();
    for record in &paper.questions {
        if let (Some(number), Some(marks)) = (record.question_number(), record.marks) {
            *sums.entry(number).or_insert(0) += marks;
        }
    }
    sums
}

/// Compare declared totals with extracted marks.
///
/// Returns one discrepancy per mismatching question total, then one for the
/// paper total if it mismatches. An empty result means the paper is consistent.
pub fn check_totals(paper: &Paper) -> Vec<MarkDiscrepancy> {
    let sums = marks_by_question(paper);

    let mut issues: Vec<MarkDiscrepancy> = paper
        .totals
        .iter()
        .filter_map(|(&number, &declared)| {
            let extracted = sums.get(&number).copied().unwrap_or(0);
            (declared != extracted).then_some(MarkDiscrepancy {
                scope: TotalScope::Question(number),
                declared,
                extracted,
            })
        })
        .collect();

    if let Some(declared) = paper.paper_total {
        let extracted = paper.total_marks();
        if declared != extracted {
            issues.push(MarkDiscrepancy {
                scope: TotalScope::Paper,
                declared,
                extracted,
            });
        }
    }

    if !issues.is_empty() {
        log::info!("Found {} mark total discrepancies", issues.len());
    }
    issues
}
