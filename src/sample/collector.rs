use super::Sample;

/// Run-scoped, append-only sample store.
///
/// IDs are assigned as `base_id + current length`, so chaining collectors
/// across flowcharts (each new builder seeded with the previous collector's
/// `next_id`) yields globally unique, monotonic ids for the whole run.
#[derive(Debug, Default)]
pub struct SampleCollector {
    base_id: usize,
    samples: Vec<Sample>,
}

impl SampleCollector {
    pub fn new(base_id: usize) -> Self {
        Self {
            base_id,
            samples: Vec::new(),
        }
    }

    /// The id the next appended sample should carry.
    pub fn next_id(&self) -> usize {
        self.base_id + self.samples.len()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn append(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn extend(&mut self, samples: impl IntoIterator<Item = Sample>) {
        self.samples.extend(samples);
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}
