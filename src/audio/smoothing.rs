use super::chroma::{Chromagram, PITCH_CLASSES};

/// Median filter along time, applied to each pitch class independently.
///
/// Near the edges the window is truncated to the frames that exist rather
/// than padded. When a truncated window holds an even number of values the
/// two middle values are averaged.
pub fn median_smooth(chroma: &Chromagram, window: usize) -> Chromagram {
    let n = chroma.num_frames();
    if window <= 1 || n == 0 {
        return chroma.clone();
    }

    let half = window / 2;
    let mut frames = vec![[0.0f32; PITCH_CLASSES]; n];
    let mut scratch: Vec<f32> = Vec::with_capacity(window);

    for class in 0..PITCH_CLASSES {
        let row = chroma.row(class);
        for (t, frame) in frames.iter_mut().enumerate() {
            let lo = t.saturating_sub(half);
            let hi = (t + half + 1).min(n);
            scratch.clear();
            scratch.extend_from_slice(&row[lo..hi]);
            frame[class] = median(&mut scratch);
        }
    }

    log::debug!("Median filtered {} chroma frames (window={})", n, window);

    Chromagram { frames }
}

fn median(values: &mut [f32]) -> f32 {
    let len = values.len();
    let mid = len / 2;
    let (lower, upper_mid, _) = values.select_nth_unstable_by(mid, f32::total_cmp);
    let upper_mid = *upper_mid;
    if len % 2 == 1 {
        upper_mid
    } else {
        let lower_mid = lower.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (lower_mid + upper_mid) / 2.0
    }
}
