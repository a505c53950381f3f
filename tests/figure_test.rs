//! Integration tests for figure detection and assignment.

use exampaper::model::{lines_from_strs, PageLayout, Rect};
use exampaper::{assign_figures, parse_bytes, segment, FigureDetector, FigureOptions, FigureRegion, Paper};

const LAYOUT_DUMP: &[u8] = br#"{"pages": [
    {"page": 1, "width": 595, "height": 842,
     "lines": [{"text": "Answer all questions.", "y": 40},
               {"text": "1. Use the graph to estimate x. [2]", "y": 100},
               {"text": "2. Look at the diagram below. [3]", "y": 400}],
     "drawings": [[100, 60, 300, 90],
                  [100, 150, 250, 250],
                  [100, 450, 200, 550], [201, 450, 300, 550],
                  [20, 20, 560, 30]]},
    {"page": 2, "width": 595, "height": 842,
     "lines": [{"text": "3. Final question.", "y": 300}],
     "drawings": [[100, 100, 300, 200]]}
]}"#;

fn region_at<'a>(paper: &'a Paper, page: u32, y0: f32) -> &'a FigureRegion {
    paper
        .figures
        .iter()
        .find(|f| f.page == page && f.rect.y0 == y0)
        .unwrap()
}

#[test]
fn test_figures_attached_to_questions() {
    let paper = parse_bytes(LAYOUT_DUMP).unwrap();

    // The header bar in the top edge band is dropped
    assert_eq!(paper.figures.len(), 4);

    let above_first = region_at(&paper, 1, 55.0);
    let graph = region_at(&paper, 1, 145.0);
    let diagram = region_at(&paper, 1, 445.0);
    let overflow = region_at(&paper, 2, 95.0);

    assert_eq!(diagram.rect, Rect::new(95.0, 445.0, 305.0, 555.0));

    let q1 = paper.get("1").unwrap();
    let q2 = paper.get("2").unwrap();
    let q3 = paper.get("3").unwrap();

    assert_eq!(q1.figures, vec![graph.id.clone()]);
    // A region at the top of page 2 still belongs to the last question of page 1
    assert_eq!(q2.figures.len(), 2);
    assert!(q2.figures.contains(&diagram.id));
    assert!(q2.figures.contains(&overflow.id));
    assert!(q3.figures.is_empty());
    assert!(paper.questions.iter().all(|q| !q.figures.contains(&above_first.id)));
}

#[test]
fn test_region_ids_are_per_page() {
    let paper = parse_bytes(LAYOUT_DUMP).unwrap();

    let mut page1: Vec<&str> = paper
        .figures
        .iter()
        .filter(|f| f.page == 1)
        .map(|f| f.id.as_str())
        .collect();
    page1.sort();
    assert_eq!(page1, vec!["p1-d0", "p1-d1", "p1-d2"]);
    assert_eq!(region_at(&paper, 2, 95.0).id, "p2-d0");
}

#[test]
fn test_assign_reports_leading_regions() {
    let regions = vec![FigureRegion {
        id: "p1-d0".to_string(),
        page: 1,
        rect: Rect::new(100.0, 0.0, 300.0, 0.5),
        width_ratio: 0.34,
        height_ratio: 0.01,
        area: 100.0,
    }];
    let mut records = segment(&lines_from_strs(&["Cover", "1. First"]));
    let unassigned = assign_figures(&mut records, &regions);

    // "1. First" sits at ordinal 1, below the region
    assert_eq!(unassigned, vec!["p1-d0"]);
    assert!(records[0].figures.is_empty());
}

#[test]
fn test_detect_all_pages() {
    let mut first = PageLayout::a4(1);
    first.add_drawing(Rect::new(100.0, 300.0, 200.0, 350.0));
    let mut second = PageLayout::a4(2);
    second.add_drawing(Rect::new(100.0, 300.0, 200.0, 350.0));
    second.add_drawing(Rect::new(100.0, 360.0, 200.0, 400.0));

    let regions = FigureDetector::new().detect_all(&[first.clone(), second.clone()]);
    assert_eq!(regions.len(), 3);
    assert_eq!(regions[0].id, "p1-d0");
    assert!(regions[1..].iter().all(|r| r.page == 2));

    // A wider vertical gap joins the two page-2 shapes
    let loose = FigureDetector::with_options(
        FigureOptions::new()
            .with_proximity_tolerance(15.0)
            .with_max_vertical_gap(60.0),
    );
    assert_eq!(loose.detect(&second).len(), 1);
}

#[test]
fn test_figures_disabled_for_text_sources() {
    let paper = parse_bytes(b"1. Draw a graph.\n2. Label it.\n").unwrap();
    assert!(paper.figures.is_empty());
    assert!(paper.questions.iter().all(|q| q.figures.is_empty()));
}
