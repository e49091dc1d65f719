//! Sample sources: the tracker side of the pipeline
//!
//! A source is any `Iterator<Item = Sample>`. It is pulled one frame at a
//! time, ends when the stream is exhausted, and is never rewound; a new
//! session builds a new source.
//!
//! - `ReplaySource`: JSON Lines recording, one frame per line
//! - `SimulatedSource`: seeded synthetic hand cycling through exercise poses

use super::landmarks::{Landmark, LandmarkSet, Sample, LANDMARK_COUNT};
use crate::error::CoachError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

// ============================================================================
// REPLAY
// ============================================================================

/// Replays a recorded landmark stream
///
/// Each non-blank line is either `null` (no hand) or an array of 21
/// `[x, y, z]` triples.
#[derive(Debug)]
pub struct ReplaySource {
    frames: std::vec::IntoIter<Sample>,
    len: usize,
}

impl ReplaySource {
    /// Load a recording from disk, validating every line up front
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoachError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::parse(BufReader::new(file), path.to_path_buf())
    }

    /// Read a recording from any buffered reader
    pub fn from_reader(reader: impl BufRead) -> Result<Self, CoachError> {
        Self::parse(reader, PathBuf::from("<stream>"))
    }

    fn parse(reader: impl BufRead, path: PathBuf) -> Result<Self, CoachError> {
        let mut frames = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let raw: Option<Vec<[f32; 3]>> = serde_json::from_str(trimmed)
                .map_err(|e| CoachError::recording(&path, line_no, e.to_string()))?;

            let sample = match raw {
                Some(points) => Some(
                    LandmarkSet::from_points(&points)
                        .map_err(|e| CoachError::recording(&path, line_no, e.to_string()))?,
                ),
                None => None,
            };
            frames.push(sample);
        }

        log::debug!("loaded {} frames from {:?}", frames.len(), path);

        Ok(ReplaySource {
            len: frames.len(),
            frames: frames.into_iter(),
        })
    }

    /// Mirror every frame horizontally
    pub fn mirrored(self, mirror: bool) -> Self {
        if !mirror {
            return self;
        }
        let frames: Vec<Sample> = self
            .frames
            .map(|s| s.map(|set| set.mirrored()))
            .collect();
        ReplaySource {
            len: frames.len(),
            frames: frames.into_iter(),
        }
    }

    /// Number of frames in the recording
    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Iterator for ReplaySource {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        self.frames.next()
    }
}

/// Write samples as a JSON Lines recording; returns the frame count
pub fn write_recording<'a, W: Write>(
    mut writer: W,
    samples: impl IntoIterator<Item = &'a Sample>,
) -> Result<usize, CoachError> {
    let mut count = 0;
    for sample in samples {
        let raw = sample.as_ref().map(|set| set.to_points());
        serde_json::to_writer(&mut writer, &raw)?;
        writer.write_all(b"\n")?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

// ============================================================================
// SIMULATION
// ============================================================================

type Pose = [[f32; 2]; LANDMARK_COUNT];

const FIST: Pose = [
    [0.5, 0.8], [0.45, 0.76], [0.43, 0.71], [0.44, 0.66],
    [0.47, 0.63], [0.46, 0.6], [0.46, 0.54], [0.465, 0.57],
    [0.465, 0.585], [0.49, 0.58], [0.49, 0.52], [0.495, 0.55],
    [0.495, 0.565], [0.52, 0.59], [0.52, 0.53], [0.525, 0.56],
    [0.525, 0.575], [0.55, 0.62], [0.55, 0.56], [0.555, 0.59],
    [0.555, 0.605],
];

const THUMB_OUT: Pose = [
    [0.5, 0.8], [0.43, 0.76], [0.36, 0.72], [0.31, 0.68],
    [0.26, 0.66], [0.46, 0.6], [0.451, 0.51], [0.445, 0.45],
    [0.44, 0.4], [0.49, 0.58], [0.49, 0.49], [0.49, 0.43],
    [0.49, 0.38], [0.52, 0.59], [0.529, 0.5], [0.535, 0.44],
    [0.54, 0.39], [0.55, 0.62], [0.568, 0.53], [0.58, 0.47],
    [0.59, 0.42],
];

const ROTATED: Pose = [
    [0.5, 0.8], [0.45, 0.76], [0.43, 0.71], [0.44, 0.66],
    [0.47, 0.63], [0.38, 0.62], [0.3575, 0.5345], [0.3425, 0.4775],
    [0.33, 0.43], [0.46, 0.59], [0.4555, 0.5045], [0.4525, 0.4475],
    [0.45, 0.4], [0.55, 0.61], [0.5635, 0.5245], [0.5725, 0.4675],
    [0.58, 0.42], [0.64, 0.66], [0.6715, 0.5745], [0.6925, 0.5175],
    [0.71, 0.47],
];

const SPREAD: Pose = [
    [0.5, 0.8], [0.43, 0.76], [0.36, 0.72], [0.31, 0.68],
    [0.26, 0.66], [0.46, 0.6], [0.406, 0.5235], [0.37, 0.4725],
    [0.34, 0.43], [0.49, 0.58], [0.4855, 0.4855], [0.4825, 0.4225],
    [0.48, 0.37], [0.52, 0.59], [0.556, 0.5045], [0.58, 0.4475],
    [0.6, 0.4], [0.55, 0.62], [0.6265, 0.5615], [0.6775, 0.5225],
    [0.72, 0.49],
];

const PINCH: Pose = [
    [0.5, 0.8], [0.45, 0.76], [0.42, 0.7], [0.43, 0.62],
    [0.47, 0.55], [0.46, 0.6], [0.465, 0.55], [0.465, 0.545],
    [0.47, 0.54], [0.49, 0.58], [0.49, 0.53], [0.49, 0.5375],
    [0.49, 0.545], [0.52, 0.59], [0.515, 0.54], [0.515, 0.55],
    [0.51, 0.56], [0.55, 0.62], [0.54, 0.57], [0.54, 0.575],
    [0.53, 0.58],
];

/// Cycle order: each exercise's target pose appears once per cycle
const POSE_CYCLE: [&Pose; 5] = [&FIST, &THUMB_OUT, &ROTATED, &SPREAD, &PINCH];

/// Synthetic hand for camera-free demo runs
///
/// Holds each key pose for the first half of its slot, then blends into
/// the next one. Adds uniform jitter and occasionally drops a frame.
pub struct SimulatedSource {
    rng: StdRng,
    frame: usize,
    max_frames: usize,
    frames_per_pose: usize,
    jitter: f32,
    dropout: f64,
}

impl SimulatedSource {
    /// Create a finite simulated stream (defaults: 20 frames per pose,
    /// ±0.004 jitter, 5% dropped frames)
    pub fn new(seed: u64, max_frames: usize) -> Self {
        SimulatedSource {
            rng: StdRng::seed_from_u64(seed),
            frame: 0,
            max_frames,
            frames_per_pose: 20,
            jitter: 0.004,
            dropout: 0.05,
        }
    }

    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter.max(0.0);
        self
    }

    pub fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout.clamp(0.0, 1.0);
        self
    }

    pub fn with_frames_per_pose(mut self, frames: usize) -> Self {
        self.frames_per_pose = frames.max(2);
        self
    }

    fn blended_pose(&self) -> [Landmark; LANDMARK_COUNT] {
        let slot = self.frame / self.frames_per_pose;
        let current = POSE_CYCLE[slot % POSE_CYCLE.len()];
        let next = POSE_CYCLE[(slot + 1) % POSE_CYCLE.len()];

        let phase = (self.frame % self.frames_per_pose) as f32 / self.frames_per_pose as f32;
        let t = ((phase - 0.5) * 2.0).max(0.0);

        let mut points = [Landmark::default(); LANDMARK_COUNT];
        for (i, p) in points.iter_mut().enumerate() {
            let [ax, ay] = current[i];
            let [bx, by] = next[i];
            *p = Landmark::new(ax + (bx - ax) * t, ay + (by - ay) * t, 0.0);
        }
        points
    }
}

impl Iterator for SimulatedSource {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.frame >= self.max_frames {
            return None;
        }

        let mut points = self.blended_pose();
        self.frame += 1;

        if self.dropout > 0.0 && self.rng.gen_bool(self.dropout) {
            return Some(None);
        }

        if self.jitter > 0.0 {
            for p in points.iter_mut() {
                p.x = (p.x + self.rng.gen_range(-self.jitter..=self.jitter)).clamp(0.0, 1.0);
                p.y = (p.y + self.rng.gen_range(-self.jitter..=self.jitter)).clamp(0.0, 1.0);
            }
        }

        Some(Some(LandmarkSet::new(points)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::landmarks::{INDEX_TIP, WRIST};
    use std::io::Cursor;

    fn flat_set(x: f32) -> Vec<[f32; 3]> {
        vec![[x, 0.5, 0.0]; LANDMARK_COUNT]
    }

    #[test]
    fn test_replay_parses_frames_and_gaps() {
        let line = serde_json::to_string(&flat_set(0.25)).unwrap();
        let text = format!("{}\nnull\n\n{}\n", line, line);
        let source = ReplaySource::from_reader(Cursor::new(text)).unwrap();
        assert_eq!(source.len(), 3);

        let frames: Vec<Sample> = source.collect();
        assert!(frames[0].is_some());
        assert!(frames[1].is_none());
        assert_eq!(frames[2].as_ref().unwrap().landmark(WRIST).x, 0.25);
    }

    #[test]
    fn test_replay_reports_bad_line() {
        let good = serde_json::to_string(&flat_set(0.1)).unwrap();
        let short = serde_json::to_string(&vec![[0.1f32, 0.1, 0.0]; 5]).unwrap();
        let text = format!("{}\n{}\n", good, short);

        let err = ReplaySource::from_reader(Cursor::new(text)).unwrap_err();
        match err {
            CoachError::Recording { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("21"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_replay_rejects_garbage() {
        let err = ReplaySource::from_reader(Cursor::new("not json\n")).unwrap_err();
        assert!(matches!(err, CoachError::Recording { line: 1, .. }));
    }

    #[test]
    fn test_replay_mirrored() {
        let line = serde_json::to_string(&flat_set(0.25)).unwrap();
        let source = ReplaySource::from_reader(Cursor::new(line))
            .unwrap()
            .mirrored(true);
        let frames: Vec<Sample> = source.collect();
        assert!((frames[0].as_ref().unwrap().landmark(INDEX_TIP).x - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_recording_written_and_replayed() {
        let samples: Vec<Sample> = SimulatedSource::new(3, 40).collect();
        let mut buf = Vec::new();
        let written = write_recording(&mut buf, &samples).unwrap();
        assert_eq!(written, 40);

        let replayed: Vec<Sample> = ReplaySource::from_reader(Cursor::new(buf))
            .unwrap()
            .collect();
        assert_eq!(replayed.len(), samples.len());
        assert_eq!(
            replayed.iter().filter(|s| s.is_none()).count(),
            samples.iter().filter(|s| s.is_none()).count()
        );
    }

    #[test]
    fn test_simulation_is_finite_and_seeded() {
        let a: Vec<Sample> = SimulatedSource::new(42, 250).collect();
        let b: Vec<Sample> = SimulatedSource::new(42, 250).collect();
        assert_eq!(a.len(), 250);
        assert_eq!(a, b);
    }

    #[test]
    fn test_simulation_stays_in_frame() {
        for sample in SimulatedSource::new(7, 300).with_jitter(0.02).flatten() {
            for i in 0..LANDMARK_COUNT {
                let l = sample.landmark(i);
                assert!((0.0..=1.0).contains(&l.x));
                assert!((0.0..=1.0).contains(&l.y));
            }
        }
    }

    #[test]
    fn test_simulation_without_noise_hits_key_pose() {
        let mut source = SimulatedSource::new(0, 10)
            .with_jitter(0.0)
            .with_dropout(0.0);
        let first = source.next().unwrap().unwrap();
        assert_eq!(first.point(INDEX_TIP).x, FIST[INDEX_TIP][0]);
        assert_eq!(first.point(INDEX_TIP).y, FIST[INDEX_TIP][1]);
    }
}
