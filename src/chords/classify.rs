use crate::audio::chroma::{Chromagram, PITCH_CLASSES};

use super::templates::{CHORD_TEMPLATES, NUM_TEMPLATES, TEMPLATE_NORM};

/// Cosine distance from a chroma column to every template.
///
/// A column with zero (or non-finite) norm has no direction; every distance
/// is reported as infinite so the caller's tie-break picks template 0.
pub fn template_distances(chroma: &[f32; PITCH_CLASSES]) -> [f32; NUM_TEMPLATES] {
    let norm = chroma.iter().map(|v| v * v).sum::<f32>().sqrt();
    let mut distances = [f32::INFINITY; NUM_TEMPLATES];
    if !(norm.is_finite() && norm > 0.0) {
        return distances;
    }

    for (d, template) in distances.iter_mut().zip(CHORD_TEMPLATES.iter()) {
        let dot: f32 = chroma.iter().zip(&template.mask).map(|(a, b)| a * b).sum();
        *d = 1.0 - dot / (norm * TEMPLATE_NORM);
    }
    distances
}

/// Index of the nearest template; the earliest index wins ties.
pub fn classify_frame(chroma: &[f32; PITCH_CLASSES]) -> usize {
    let distances = template_distances(chroma);
    let mut best = 0;
    for (i, &d) in distances.iter().enumerate().skip(1) {
        if d < distances[best] {
            best = i;
        }
    }
    best
}

/// One template index per chroma frame.
pub fn classify(chroma: &Chromagram) -> Vec<usize> {
    let indices: Vec<usize> = chroma.frames.iter().map(classify_frame).collect();
    let silent = chroma
        .frames
        .iter()
        .filter(|f| f.iter().all(|&v| v == 0.0))
        .count();
    log::debug!(
        "Classified {} frames ({} silent, fallback to {})",
        indices.len(),
        silent,
        CHORD_TEMPLATES[0].name
    );
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chords::templates::template_by_name;

    fn profile(classes: &[(usize, f32)]) -> [f32; PITCH_CLASSES] {
        let mut c = [0.0; PITCH_CLASSES];
        for &(pc, v) in classes {
            c[pc] = v;
        }
        c
    }

    #[test]
    fn exact_template_matches_itself() {
        for (i, t) in CHORD_TEMPLATES.iter().enumerate() {
            assert_eq!(classify_frame(&t.mask), i, "{}", t.name);
        }
    }

    #[test]
    fn loudness_does_not_change_chord() {
        let quiet = profile(&[(9, 0.01), (0, 0.008), (4, 0.009), (2, 0.001)]);
        let loud = quiet.map(|v| v * 1000.0);
        let (am, _) = template_by_name("Am").unwrap();
        assert_eq!(classify_frame(&quiet), am);
        assert_eq!(classify_frame(&loud), am);
    }

    #[test]
    fn silence_falls_back_to_first_template() {
        let zero = [0.0; PITCH_CLASSES];
        assert!(template_distances(&zero).iter().all(|d| d.is_infinite()));
        assert_eq!(classify_frame(&zero), 0);
    }

    #[test]
    fn ties_keep_lowest_index() {
        // C and E fit C major (0) and A minor (19) equally.
        let shared = profile(&[(0, 1.0), (4, 1.0)]);
        assert_eq!(classify_frame(&shared), 0);

        // A lone F# fits D, F#, F#m, B, Bm, D#m equally; D (4) is first.
        let lone = profile(&[(6, 1.0)]);
        assert_eq!(classify_frame(&lone), 4);
    }

    #[test]
    fn distances_are_cosine() {
        let d = template_distances(&CHORD_TEMPLATES[0].mask);
        assert!(d[0].abs() < 1e-6);
        // C major vs C minor share two of three notes.
        assert!((d[1] - (1.0 - 2.0 / 3.0)).abs() < 1e-6);
    }
}
