//! Energy curve estimation from transcript word density.
//!
//! No audio is decoded. Each window's energy is derived from how many words
//! start inside it, which tracks speaking intensity closely enough for
//! ranking and pacing decisions.

use crate::error::{ClipError, Result};
use crate::project::TranscriptWord;
use serde::Serialize;

/// Energy of a window with no speech.
pub const BASE_ENERGY: f64 = 30.0;
/// Energy added per word in a window.
pub const ENERGY_PER_WORD: f64 = 15.0;
pub const MAX_ENERGY: f64 = 100.0;
/// Peaks must exceed this energy.
pub const PEAK_THRESHOLD: f64 = 70.0;
/// Valleys must be below this energy.
pub const VALLEY_THRESHOLD: f64 = 40.0;
/// Largest accepted window count.
pub const MAX_RESOLUTION: usize = 1000;
/// Maximum peaks and valleys reported in a summary.
pub const MAX_MARKERS: usize = 5;

/// Energy of one window.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnergySample {
    /// Window start in seconds.
    pub time: f64,
    pub energy: f64,
    pub word_count: usize,
}

/// A local maximum or minimum on the curve.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnergyMarker {
    pub time: f64,
    pub energy: f64,
}

/// Energy curve over a time range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyCurve {
    pub start_time: f64,
    pub end_time: f64,
    pub resolution: usize,
    pub samples: Vec<EnergySample>,
    pub average_energy: f64,
    pub peaks: Vec<EnergyMarker>,
    pub valleys: Vec<EnergyMarker>,
}

/// Energy for a window containing `word_count` words.
pub fn window_energy(word_count: usize) -> f64 {
    (BASE_ENERGY + ENERGY_PER_WORD * word_count as f64).min(MAX_ENERGY)
}

/// Build the energy curve for `[start, end]` split into `resolution` windows.
///
/// A word belongs to the window containing its start time; the final window
/// is closed on the right so a word starting exactly at `end` is counted.
pub fn energy_curve(
    words: &[TranscriptWord],
    start: f64,
    end: f64,
    resolution: usize,
) -> Result<EnergyCurve> {
    if resolution == 0 || resolution > MAX_RESOLUTION {
        return Err(ClipError::InvalidArguments(format!(
            "resolution must be between 1 and {} (got {})",
            MAX_RESOLUTION, resolution
        )));
    }
    if end <= start {
        return Err(ClipError::InvalidArguments(format!(
            "Time range is empty ({:.2}s to {:.2}s)",
            start, end
        )));
    }

    let window = (end - start) / resolution as f64;
    let mut counts = vec![0usize; resolution];

    for word in words {
        if word.start < start || word.start > end {
            continue;
        }
        let index = (((word.start - start) / window).floor() as usize).min(resolution - 1);
        counts[index] += 1;
    }

    let samples: Vec<EnergySample> = counts
        .iter()
        .enumerate()
        .map(|(i, &word_count)| EnergySample {
            time: start + window * i as f64,
            energy: window_energy(word_count),
            word_count,
        })
        .collect();

    let energies: Vec<f64> = samples.iter().map(|s| s.energy).collect();
    let average_energy = energies.iter().sum::<f64>() / resolution as f64;

    let marker = |i: usize| EnergyMarker {
        time: samples[i].time,
        energy: samples[i].energy,
    };
    let peaks = peak_indices(&energies)
        .into_iter()
        .take(MAX_MARKERS)
        .map(marker)
        .collect();
    let valleys = valley_indices(&energies)
        .into_iter()
        .take(MAX_MARKERS)
        .map(marker)
        .collect();

    Ok(EnergyCurve {
        start_time: start,
        end_time: end,
        resolution,
        samples,
        average_energy,
        peaks,
        valleys,
    })
}

/// Interior indices strictly greater than both neighbors and above the peak threshold.
pub fn peak_indices(values: &[f64]) -> Vec<usize> {
    interior(values)
        .filter(|&i| {
            values[i] > values[i - 1] && values[i] > values[i + 1] && values[i] > PEAK_THRESHOLD
        })
        .collect()
}

/// Interior indices strictly less than both neighbors and below the valley threshold.
pub fn valley_indices(values: &[f64]) -> Vec<usize> {
    interior(values)
        .filter(|&i| {
            values[i] < values[i - 1] && values[i] < values[i + 1] && values[i] < VALLEY_THRESHOLD
        })
        .collect()
}

fn interior(values: &[f64]) -> std::ops::Range<usize> {
    if values.len() < 3 {
        0..0
    } else {
        1..values.len() - 1
    }
}

/// Mean energy over a range, or the base energy if the range is empty.
pub fn mean_energy(words: &[TranscriptWord], start: f64, end: f64, resolution: usize) -> f64 {
    energy_curve(words, start, end, resolution)
        .map(|curve| curve.average_energy)
        .unwrap_or(BASE_ENERGY)
}
