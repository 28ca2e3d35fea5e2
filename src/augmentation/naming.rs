//! Output unit naming
//!
//! Augmented units are named `{base}_{stage:02}_{kind}[_{index}]` with a fixed
//! extension. Stage 00 is the clean copy, followed by noise (01), volume (02)
//! and shift (03). Variant indices are 1-based; the clean copy has none.

use std::path::{Path, PathBuf};

/// Extension of raw PCM units written by the augmentation stage
pub const PCM_EXTENSION: &str = "bin";

/// Kind of augmentation that produced a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AugmentationKind {
    /// Unmodified standardized source
    Clean,
    /// Background noise mixed at a target SNR
    Noise,
    /// Amplitude scaled
    Volume,
    /// Time shifted with edge zeroing
    Shift,
}

impl AugmentationKind {
    /// Stage number used in file names
    pub fn stage(&self) -> u8 {
        match self {
            AugmentationKind::Clean => 0,
            AugmentationKind::Noise => 1,
            AugmentationKind::Volume => 2,
            AugmentationKind::Shift => 3,
        }
    }

    /// Short tag used in file names
    pub fn tag(&self) -> &'static str {
        match self {
            AugmentationKind::Clean => "clean",
            AugmentationKind::Noise => "noise",
            AugmentationKind::Volume => "vol",
            AugmentationKind::Shift => "shift",
        }
    }
}

/// File stem for one augmented unit
///
/// # Example
///
/// ```
/// use kws_dsp::augmentation::naming::{unit_stem, AugmentationKind};
///
/// assert_eq!(unit_stem("7", AugmentationKind::Clean, None), "7_00_clean");
/// assert_eq!(unit_stem("7", AugmentationKind::Noise, Some(3)), "7_01_noise_3");
/// ```
pub fn unit_stem(base: &str, kind: AugmentationKind, index: Option<usize>) -> String {
    match index {
        Some(i) => format!("{}_{:02}_{}_{}", base, kind.stage(), kind.tag(), i),
        None => format!("{}_{:02}_{}", base, kind.stage(), kind.tag()),
    }
}

/// File stem for the `index`-th noise-mixed negative of a labeled source,
/// tagged with the SNR it was mixed at
///
/// ```
/// use kws_dsp::augmentation::naming::negative_stem;
///
/// assert_eq!(negative_stem("CONF", "w3", 4, -5.0), "CONF_w3_AUG_04_SNR-5");
/// assert_eq!(negative_stem("DAILY", "s1", 0, 7.5), "DAILY_s1_AUG_00_SNR7.5");
/// ```
pub fn negative_stem(label: &str, base: &str, index: usize, snr_db: f32) -> String {
    format!("{}_{}_AUG_{:02}_SNR{}", label, base, index, snr_db)
}

/// File stem for the `index`-th pure-noise slice
pub fn noise_slice_stem(index: usize) -> String {
    format!("NOISE_{:04}", index)
}

/// Metadata tying a source capture to one generated unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRecord {
    /// Base name of the source capture (file stem)
    pub base_name: String,
    /// Kind of augmentation
    pub kind: AugmentationKind,
    /// 1-based variant index, `None` for the clean copy
    pub index: Option<usize>,
    /// Where the unit was written
    pub path: PathBuf,
}

impl SampleRecord {
    /// Record for a unit placed in `output_dir`
    pub fn new(
        base_name: &str,
        kind: AugmentationKind,
        index: Option<usize>,
        output_dir: &Path,
    ) -> Self {
        let path = output_dir.join(format!(
            "{}.{}",
            unit_stem(base_name, kind, index),
            PCM_EXTENSION
        ));
        Self {
            base_name: base_name.to_string(),
            kind,
            index,
            path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let kinds = [
            AugmentationKind::Clean,
            AugmentationKind::Noise,
            AugmentationKind::Volume,
            AugmentationKind::Shift,
        ];
        let stages: Vec<u8> = kinds.iter().map(|k| k.stage()).collect();
        assert_eq!(stages, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_unit_stems() {
        assert_eq!(unit_stem("12", AugmentationKind::Volume, Some(2)), "12_02_vol_2");
        assert_eq!(unit_stem("12", AugmentationKind::Shift, Some(1)), "12_03_shift_1");
        assert_eq!(negative_stem("CONF", "w3", 4, 10.0), "CONF_w3_AUG_04_SNR10");
        assert_eq!(noise_slice_stem(17), "NOISE_0017");
    }

    #[test]
    fn test_record_path() {
        let record = SampleRecord::new("5", AugmentationKind::Clean, None, Path::new("/out"));
        assert_eq!(record.path, PathBuf::from("/out/5_00_clean.bin"));
    }
}
