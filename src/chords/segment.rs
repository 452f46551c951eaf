use serde::Serialize;

use super::templates::CHORD_TEMPLATES;

/// A chord change: the chord that starts at `time`.
///
/// `time` is the fractional position `frame / total_frames` within the track,
/// in `[0, 1)`, unless converted with
/// [`ChordAnalysis::events_in_seconds`](crate::ChordAnalysis::events_in_seconds).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChordEvent {
    pub chord: String,
    pub time: f64,
    /// Frame at which the chord starts.
    #[serde(skip)]
    pub frame: usize,
}

/// Collapse runs of identical classifications into chord-change events.
pub fn segment(classifications: &[usize]) -> Vec<ChordEvent> {
    let total = classifications.len();
    let mut events = Vec::new();
    let mut current: Option<usize> = None;

    for (frame, &template) in classifications.iter().enumerate() {
        if current == Some(template) {
            continue;
        }
        events.push(ChordEvent {
            chord: CHORD_TEMPLATES[template].name.to_string(),
            time: frame as f64 / total as f64,
            frame,
        });
        current = Some(template);
    }

    log::debug!("Segmented {} frames into {} chord events", total, events.len());
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changes(seq: &[usize]) -> usize {
        seq.windows(2).filter(|w| w[0] != w[1]).count()
    }

    #[test]
    fn empty_sequence_has_no_events() {
        assert!(segment(&[]).is_empty());
    }

    #[test]
    fn first_frame_always_emits() {
        let events = segment(&[19, 19, 19, 19]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].chord, "Am");
        assert_eq!(events[0].time, 0.0);
    }

    #[test]
    fn emits_on_every_change() {
        let seq = [0, 0, 19, 19, 19, 0, 14, 14];
        let events = segment(&seq);
        let names: Vec<&str> = events.iter().map(|e| e.chord.as_str()).collect();
        assert_eq!(names, vec!["C", "Am", "C", "G"]);
        let times: Vec<f64> = events.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![0.0, 2.0 / 8.0, 5.0 / 8.0, 6.0 / 8.0]);
    }

    #[test]
    fn event_count_matches_changes_for_many_sequences() {
        // Deterministic pseudo-random sequences with long and short runs.
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        for len in 1..60 {
            let seq: Vec<usize> = (0..len)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    (state % 3) as usize * 7
                })
                .collect();
            let events = segment(&seq);
            assert_eq!(events.len(), 1 + changes(&seq));
            assert!(events.windows(2).all(|w| w[0].time < w[1].time));
            assert!(events.iter().all(|e| e.time >= 0.0 && e.time < 1.0));
        }
    }

    #[test]
    fn serializes_chord_and_time_only() {
        let events = segment(&[0, 0, 19, 19]);
        let json = serde_json::to_string(&events).unwrap();
        assert_eq!(json, r#"[{"chord":"C","time":0.0},{"chord":"Am","time":0.5}]"#);
    }
}
