//! Acceptance scenarios for the overlap search.

use stitchmatch::lowlevel::{Evaluation, LineMatcher, OverlayEvaluator, SearchState};
use stitchmatch::{
    Attempt, CandidateOffset, EventLog, MatchConfig, OverlapSearch, ProgressSink, RasterImage,
    SearchEvent,
};

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn candidate(x_offset: isize, y_offset: usize) -> CandidateOffset {
    CandidateOffset { x_offset, y_offset }
}

fn lines_of(log: &EventLog, c: CandidateOffset) -> Vec<usize> {
    log.attempts_for(c).iter().map(|a| a.lines).collect()
}

fn unit_config() -> MatchConfig {
    MatchConfig {
        provisional_match_width_factor: 1.0,
        min_matching_lines: 1,
        max_horizontal_offset: 1,
        max_y_offset_factor: 1.0,
        parallel: false,
    }
}

#[test]
fn identical_solid_images_match_at_every_overlap() {
    let top = RasterImage::filled(4, 4, RED).unwrap();
    let bottom = top.clone();
    let cfg = unit_config();
    let search = OverlapSearch::new(cfg.clone());

    let mut log = EventLog::new();
    let outcome = search.run(top.view(), bottom.view(), &mut log).unwrap();

    // Matching the full width leaves no room for horizontal offsets.
    assert_eq!(
        log.events().first(),
        Some(&SearchEvent::Attempt(Attempt {
            x_offset: 0,
            y_offset: 1,
            lines: 0,
        }))
    );
    assert_eq!(log.events().last(), Some(&SearchEvent::Exhausted));
    assert_eq!(outcome.candidates_evaluated, 3);
    assert_eq!(
        outcome.matched(),
        Some(Attempt {
            x_offset: 0,
            y_offset: 3,
            lines: 3,
        })
    );

    // Re-drive the candidates one by one: each reaches its full overlap.
    let space = search.prepare(top.view(), bottom.view()).unwrap();
    let evaluator = OverlayEvaluator::new(
        LineMatcher::new(top.view(), bottom.view(), space),
        cfg.min_matching_lines,
    );
    let mut state = SearchState::new();
    let mut sink = EventLog::new();
    let depths: Vec<Evaluation> = space
        .candidates()
        .map(|c| evaluator.evaluate(c, &mut state, &mut sink))
        .collect();
    assert_eq!(depths[0], Evaluation::Walked { lines: 1 });
    assert_eq!(depths[1], Evaluation::Walked { lines: 2 });
    assert_eq!(depths[2], Evaluation::Walked { lines: 3 });
    sink.emit(SearchEvent::Exhausted);
    assert_eq!(sink, log);
}

#[test]
fn disjoint_colors_never_match() {
    let top = RasterImage::filled(4, 4, RED).unwrap();
    let bottom = RasterImage::filled(4, 4, BLUE).unwrap();
    let mut log = EventLog::new();
    let outcome = OverlapSearch::new(unit_config())
        .run(top.view(), bottom.view(), &mut log)
        .unwrap();

    assert_eq!(outcome.best_lines, 0);
    assert_eq!(outcome.best, None);
    assert!(outcome.matched().is_none());
    assert!(log.attempts().all(|a| a.lines == 0));
    assert_eq!(log.attempts().count(), outcome.candidates_evaluated);
}

/// Pixel of the synthetic top capture; columns may run past the image so the
/// shifted bottom capture can be derived from the same function.
fn scene(x: isize, y: usize) -> [u8; 4] {
    [((x + 3) * 10) as u8, (y * 10) as u8, 50, 255]
}

/// 16x12 top capture and a 16x12 bottom capture whose first five rows are the
/// top's last five rows with `bottom[x] == top[x + shift]`.
fn shifted_pair(shift: isize) -> (RasterImage, RasterImage) {
    let (width, height, overlap) = (16usize, 12usize, 5usize);
    let mut top = Vec::new();
    for y in 0..height {
        for x in 0..width {
            top.extend_from_slice(&scene(x as isize, y));
        }
    }
    let mut bottom = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if y < overlap {
                bottom.extend_from_slice(&scene(x as isize + shift, height - overlap + y));
            } else {
                bottom.extend_from_slice(&[x as u8, y as u8, 200, 255]);
            }
        }
    }
    (
        RasterImage::new(top, width, height).unwrap(),
        RasterImage::new(bottom, width, height).unwrap(),
    )
}

fn shift_config() -> MatchConfig {
    MatchConfig {
        provisional_match_width_factor: 0.5,
        min_matching_lines: 3,
        max_horizontal_offset: 3,
        max_y_offset_factor: 1.0,
        parallel: false,
    }
}

#[test]
fn content_shifted_left_is_found_at_positive_offset() {
    let (top, bottom) = shifted_pair(2);
    let mut log = EventLog::new();
    let outcome = OverlapSearch::new(shift_config())
        .run(top.view(), bottom.view(), &mut log)
        .unwrap();
    assert_eq!(
        outcome.matched(),
        Some(Attempt {
            x_offset: 2,
            y_offset: 5,
            lines: 5,
        })
    );
    assert_eq!(lines_of(&log, candidate(2, 5)), vec![0, 1, 2, 3, 4]);
    assert_eq!(lines_of(&log, candidate(-2, 5)), vec![0]);
}

#[test]
fn content_shifted_right_is_found_at_negative_offset() {
    let (top, bottom) = shifted_pair(-2);
    let outcome = OverlapSearch::new(shift_config())
        .find_best(top.view(), bottom.view())
        .unwrap();
    assert_eq!(
        outcome.matched(),
        Some(Attempt {
            x_offset: -2,
            y_offset: 5,
            lines: 5,
        })
    );
}

#[test]
fn zero_vertical_factor_only_reports_exhaustion() {
    let img = RasterImage::filled(4, 4, RED).unwrap();
    let cfg = MatchConfig {
        max_y_offset_factor: 0.0,
        ..unit_config()
    };
    let mut log = EventLog::new();
    let outcome = OverlapSearch::new(cfg)
        .run(img.view(), img.view(), &mut log)
        .unwrap();
    assert_eq!(log.events(), &[SearchEvent::Exhausted]);
    assert_eq!(outcome.candidates_evaluated, 0);
    assert_eq!(outcome.best, None);
}

/// Image of solid rows where the listed rows use a second color.
fn striped(height: usize, odd_rows: &[usize]) -> RasterImage {
    let mut pixels = Vec::new();
    for y in 0..height {
        let color = if odd_rows.contains(&y) { BLUE } else { RED };
        for _ in 0..4 {
            pixels.extend_from_slice(&color);
        }
    }
    RasterImage::new(pixels, 4, height).unwrap()
}

#[test]
fn depth_five_record_prunes_later_candidates() {
    let top = striped(12, &[]);
    let bottom = striped(12, &[5]);
    let cfg = MatchConfig {
        max_horizontal_offset: 0,
        ..unit_config()
    };
    let mut log = EventLog::new();
    let outcome = OverlapSearch::new(cfg)
        .run(top.view(), bottom.view(), &mut log)
        .unwrap();

    assert_eq!(
        outcome.best,
        Some(Attempt {
            x_offset: 0,
            y_offset: 5,
            lines: 5,
        })
    );
    assert_eq!(lines_of(&log, candidate(0, 5)), vec![0, 1, 2, 3, 4]);
    for y_offset in 6..12 {
        // Row 0 still matches; row 5 is the stripe, so no walk happens.
        assert_eq!(lines_of(&log, candidate(0, y_offset)), vec![0]);
    }
}
