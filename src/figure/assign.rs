//! Attaching figure regions to question records.

use std::cmp::Ordering;

use crate::model::{FigureRegion, QuestionRecord};

/// Attach each region to the last record starting at or above it.
///
/// Records must be in reading order. Returns the ids of regions that sit
/// before the first record (cover-page artwork, formula sheets).
pub fn assign_figures(records: &mut [QuestionRecord], regions: &[FigureRegion]) -> Vec<String> {
    let mut unassigned = Vec::new();

    for region in regions {
        let owner = records
            .iter()
            .rposition(|r| starts_before(r, region.page, region.rect.y0));

        match owner {
            Some(index) => {
                let record = &mut records[index];
                if !record.figures.contains(&region.id) {
                    record.figures.push(region.id.clone());
                }
            }
            None => {
                log::debug!("Figure {} precedes every question", region.id);
                unassigned.push(region.id.clone());
            }
        }
    }

    unassigned
}

fn starts_before(record: &QuestionRecord, page: u32, y: f32) -> bool {
    match record.page.cmp(&page) {
        Ordering::Less => true,
        Ordering::Equal => record.y <= y,
        Ordering::Greater => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QuestionLabel, Rect};

    fn record(number: u32, page: u32, y: f32) -> QuestionRecord {
        QuestionRecord::new(QuestionLabel::question(number), page, y)
    }

    fn region(id: &str, page: u32, y0: f32) -> FigureRegion {
        FigureRegion {
            id: id.to_string(),
            page,
            rect: Rect::new(100.0, y0, 300.0, y0 + 100.0),
            width_ratio: 0.3,
            height_ratio: 0.1,
            area: 20000.0,
        }
    }

    #[test]
    fn test_assign_by_position() {
        let mut records = vec![record(1, 2, 100.0), record(2, 2, 400.0), record(3, 3, 80.0)];
        let regions = vec![
            region("p2-d0", 2, 150.0),
            region("p2-d1", 2, 500.0),
            region("p3-d0", 3, 40.0),
        ];

        let unassigned = assign_figures(&mut records, &regions);
        assert!(unassigned.is_empty());
        assert_eq!(records[0].figures, vec!["p2-d0"]);
        // Above question 3 on its page, so it belongs to question 2
        assert_eq!(records[1].figures, vec!["p2-d1", "p3-d0"]);
        assert!(records[2].figures.is_empty());
    }

    #[test]
    fn test_assign_before_first_record() {
        let mut records = vec![record(1, 2, 100.0)];
        let unassigned = assign_figures(&mut records, &[region("p1-d0", 1, 300.0)]);
        assert_eq!(unassigned, vec!["p1-d0"]);
        assert!(records[0].figures.is_empty());
    }

    #[test]
    fn test_assign_is_repeatable() {
        let mut records = vec![record(1, 1, 0.0)];
        let regions = vec![region("p1-d0", 1, 200.0)];
        assign_figures(&mut records, &regions);
        assign_figures(&mut records, &regions);
        assert_eq!(records[0].figures, vec!["p1-d0"]);
    }
}
