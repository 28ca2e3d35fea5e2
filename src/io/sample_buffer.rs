//! Normalized mono sample buffer and fixed-stride framing

/// Mono audio in the normalized range [-1.0, 1.0] at a known sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Sample data
    samples: Vec<f32>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl AudioBuffer {
    /// Wrap existing samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// All-zero buffer of `len` samples
    pub fn silence(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length in samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Borrow the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Take ownership of the samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Iterate over whole frames of `frame_len` samples starting every `hop`
    /// samples. A trailing partial frame is never yielded.
    pub fn frames(&self, frame_len: usize, hop: usize) -> Frames<'_> {
        Frames {
            data: &self.samples,
            frame_len,
            hop,
            position: 0,
        }
    }
}

/// Iterator over overlapping analysis frames of an [`AudioBuffer`]
#[derive(Debug)]
pub struct Frames<'a> {
    data: &'a [f32],
    frame_len: usize,
    hop: usize,
    position: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        if self.frame_len == 0 || self.hop == 0 {
            return None;
        }
        let end = self.position.checked_add(self.frame_len)?;
        if end > self.data.len() {
            return None;
        }
        let window = &self.data[self.position..end];
        self.position += self.hop;
        Some(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_count_and_stride() {
        let samples: Vec<f32> = (0..1000).map(|i| i as f32).collect();
        let buffer = AudioBuffer::new(samples, 16_000);

        let frames: Vec<&[f32]> = buffer.frames(400, 160).collect();
        // (1000 - 400) / 160 + 1 = 4
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[1][0], 160.0);
        assert!(frames.iter().all(|f| f.len() == 400));
    }

    #[test]
    fn test_frames_short_buffer() {
        let buffer = AudioBuffer::silence(100, 16_000);
        assert_eq!(buffer.frames(400, 160).count(), 0);
        assert_eq!(buffer.frames(0, 160).count(), 0);
    }

    #[test]
    fn test_duration() {
        let buffer = AudioBuffer::silence(19_200, 16_000);
        assert!((buffer.duration_secs() - 1.2).abs() < 1e-6);
    }
}
