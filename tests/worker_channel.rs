use std::time::Duration;
use stitchmatch::{spawn_search, EventLog, MatchConfig, OverlapSearch, RasterImage, SearchEvent};

fn gradient(width: usize, height: usize) -> RasterImage {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&[(x * 7) as u8, (y * 5) as u8, 1, 255]);
        }
    }
    RasterImage::new(pixels, width, height).unwrap()
}

fn config() -> MatchConfig {
    MatchConfig {
        provisional_match_width_factor: 0.5,
        min_matching_lines: 2,
        max_horizontal_offset: 2,
        max_y_offset_factor: 0.8,
        parallel: false,
    }
}

#[test]
fn worker_stream_equals_in_process_stream() {
    let top = gradient(20, 16);
    let bottom = gradient(20, 16);

    let mut expected = EventLog::new();
    let outcome = OverlapSearch::new(config())
        .run(top.view(), bottom.view(), &mut expected)
        .unwrap();

    let worker = spawn_search(top, bottom, config()).unwrap();
    let mut received = Vec::new();
    loop {
        let event = worker.recv_timeout(Duration::from_secs(30)).unwrap();
        received.push(event);
        if event.is_exhausted() {
            break;
        }
    }
    assert_eq!(received, expected.events());
    assert_eq!(worker.join().unwrap(), outcome);
}

#[test]
fn dropping_the_events_does_not_stop_the_search() {
    let worker = spawn_search(gradient(12, 12), gradient(12, 12), config()).unwrap();
    let first = worker.recv().unwrap();
    assert!(matches!(first, SearchEvent::Attempt(a) if a.lines == 0));
    let outcome = worker.join().unwrap();
    assert!(outcome.candidates_evaluated > 0);
}
