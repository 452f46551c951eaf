//! Fixed major/minor triad templates.
//!
//! The table order is the classification index and never changes: for each
//! root from C to B, the major triad followed by the minor triad.

use crate::audio::chroma::{PITCH_CLASSES, PITCH_CLASS_NAMES};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChordQuality {
    Major,
    Minor,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChordTemplate {
    pub name: &'static str,
    /// Pitch class of the root, 0 = C.
    pub root: usize,
    pub quality: ChordQuality,
    /// Binary pitch-class mask of the triad.
    pub mask: [f32; PITCH_CLASSES],
}

impl ChordTemplate {
    pub fn root_name(&self) -> &'static str {
        PITCH_CLASS_NAMES[self.root]
    }

    /// Pitch classes of root, third and fifth.
    pub fn pitch_classes(&self) -> [usize; 3] {
        let third = match self.quality {
            ChordQuality::Major => 4,
            ChordQuality::Minor => 3,
        };
        [self.root, (self.root + third) % 12, (self.root + 7) % 12]
    }
}

pub const NUM_TEMPLATES: usize = 24;

/// Euclidean norm shared by every triad mask.
pub const TEMPLATE_NORM: f32 = 1.732_050_8;

const fn triad(name: &'static str, root: usize, quality: ChordQuality) -> ChordTemplate {
    let third = match quality {
        ChordQuality::Major => 4,
        ChordQuality::Minor => 3,
    };
    let mut mask = [0.0f32; PITCH_CLASSES];
    mask[root] = 1.0;
    mask[(root + third) % 12] = 1.0;
    mask[(root + 7) % 12] = 1.0;
    ChordTemplate {
        name,
        root,
        quality,
        mask,
    }
}

use ChordQuality::{Major, Minor};

pub static CHORD_TEMPLATES: [ChordTemplate; NUM_TEMPLATES] = [
    triad("C", 0, Major),
    triad("Cm", 0, Minor),
    triad("C#", 1, Major),
    triad("C#m", 1, Minor),
    triad("D", 2, Major),
    triad("Dm", 2, Minor),
    triad("D#", 3, Major),
    triad("D#m", 3, Minor),
    triad("E", 4, Major),
    triad("Em", 4, Minor),
    triad("F", 5, Major),
    triad("Fm", 5, Minor),
    triad("F#", 6, Major),
    triad("F#m", 6, Minor),
    triad("G", 7, Major),
    triad("Gm", 7, Minor),
    triad("G#", 8, Major),
    triad("G#m", 8, Minor),
    triad("A", 9, Major),
    triad("Am", 9, Minor),
    triad("A#", 10, Major),
    triad("A#m", 10, Minor),
    triad("B", 11, Major),
    triad("Bm", 11, Minor),
];

pub fn template_by_name(name: &str) -> Option<(usize, &'static ChordTemplate)> {
    CHORD_TEMPLATES
        .iter()
        .enumerate()
        .find(|(_, t)| t.name == name)
}
