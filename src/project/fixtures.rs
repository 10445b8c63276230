//! Shared test fixtures.

use super::{Clip, ClipStatus, DeadSpace, MemoryProject, ProjectSnapshot, TranscriptWord};

/// Continuous speech: 0.3s words every 0.4s between `start` and `end`.
pub(crate) fn speech(start: f64, end: f64) -> Vec<TranscriptWord> {
    let mut words = Vec::new();
    let mut k = 0;
    loop {
        let t = start + 0.4 * k as f64;
        if t + 0.3 > end + 1e-9 {
            break;
        }
        words.push(TranscriptWord::new(t, t + 0.3, &format!("w{}", words.len())));
        k += 1;
    }
    words
}

pub(crate) fn clip(id: &str, start: f64, end: f64, score: f64, hook: f64) -> Clip {
    let mut clip = Clip::new(id, start, end, score);
    clip.hook_strength = hook;
    clip
}

pub(crate) fn clip_with_status(
    id: &str,
    start: f64,
    end: f64,
    score: f64,
    status: ClipStatus,
) -> Clip {
    let mut clip = clip(id, start, end, score, 60.0);
    clip.status = status;
    clip
}

pub(crate) fn project_with(
    clips: Vec<Clip>,
    transcript: Option<Vec<TranscriptWord>>,
) -> MemoryProject {
    MemoryProject::new(ProjectSnapshot {
        media_path: Some("/media/stream.mp4".into()),
        media_duration: Some(120.0),
        clips,
        transcript,
        dead_spaces: Vec::new(),
    })
}

/// Three clips over a two-minute recording with speech islands and gaps.
pub(crate) fn sample_project() -> MemoryProject {
    let mut c1 = clip("c1", 10.0, 40.0, 85.0, 70.0);
    c1.title = Some("Opening rant".to_string());
    c1.category = Some("rant".to_string());

    let mut c2 = clip("c2", 50.0, 70.0, 72.0, 40.0);
    c2.category = Some("gameplay".to_string());

    let mut c3 = clip("c3", 80.0, 100.0, 55.0, 65.0);
    c3.category = Some("rant".to_string());
    c3.is_complete = false;

    let mut transcript = Vec::new();
    for (start, end) in [(2.0, 8.0), (11.0, 24.0), (25.0, 38.0), (52.0, 68.0), (81.0, 99.0)] {
        transcript.extend(speech(start, end));
    }

    MemoryProject::new(ProjectSnapshot {
        media_path: Some("/media/stream.mp4".into()),
        media_duration: Some(120.0),
        clips: vec![c1, c2, c3],
        transcript: Some(transcript),
        dead_spaces: vec![
            DeadSpace {
                id: "d1".to_string(),
                start_time: 8.0,
                end_time: 11.0,
                duration: 3.0,
                remove: false,
            },
            DeadSpace {
                id: "d2".to_string(),
                start_time: 99.0,
                end_time: 110.0,
                duration: 11.0,
                remove: false,
            },
        ],
    })
}
