//! Planar multi-channel sample buffer.

/// A planar `f32` audio buffer with a fixed capacity and an active length.
///
/// The buffer is allocated once with `capacity` frames per channel and then
/// reused block after block. [`set_num_samples`](Self::set_num_samples)
/// narrows the active region so plugins only see the frames that belong to
/// the current block; samples beyond the active length are never exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    num_samples: usize,
    capacity: usize,
}

impl AudioBuffer {
    /// Allocate a zeroed buffer. The active length starts at `capacity`.
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        Self {
            channels: vec![vec![0.0; capacity]; num_channels],
            num_samples: capacity,
            capacity,
        }
    }

    /// Build a buffer from per-channel sample vectors.
    ///
    /// All channels are truncated to the length of the shortest one.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Self {
        let len = channels.iter().map(Vec::len).min().unwrap_or(0);
        let channels = channels
            .into_iter()
            .map(|mut c| {
                c.truncate(len);
                c
            })
            .collect();
        Self {
            channels,
            num_samples: len,
            capacity: len,
        }
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Active length in frames.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Allocated frames per channel.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Set the active length, clamped to the capacity.
    pub fn set_num_samples(&mut self, num_samples: usize) {
        self.num_samples = num_samples.min(self.capacity);
    }

    /// Zero every sample, including frames outside the active region.
    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
    }

    /// Active samples of one channel.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_channels()`.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index][..self.num_samples]
    }

    /// Mutable active samples of one channel.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_channels()`.
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index][..self.num_samples]
    }

    /// Iterate over the active region of every channel.
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        let n = self.num_samples;
        self.channels.iter().map(move |c| &c[..n])
    }

    /// Mutable iteration over the active region of every channel.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        let n = self.num_samples;
        self.channels.iter_mut().map(move |c| &mut c[..n])
    }

    /// Interleave the active region into `out`, replacing its contents.
    pub fn interleave_into(&self, out: &mut Vec<f32>) {
        out.clear();
        out.reserve(self.num_samples * self.channels.len());
        for frame in 0..self.num_samples {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
    }

    /// Largest absolute sample value in the active region.
    pub fn peak(&self) -> f32 {
        self.channels()
            .flat_map(|c| c.iter())
            .fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }
}
