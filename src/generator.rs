use rand::Rng;

/// Configuration for sequence generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenConfig {
    pub sequence_count: usize,
    pub digits_per_sequence: usize,
}

/// The digit strings a player has to memorize in one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSet {
    sequences: Vec<String>,
    // starts[i] is where sequence i begins in the flattened response;
    // the last entry is the total digit count
    starts: Vec<usize>,
}

impl SequenceSet {
    pub fn new(sequences: Vec<String>) -> Self {
        let mut starts = Vec::with_capacity(sequences.len() + 1);
        let mut offset = 0;
        starts.push(offset);
        for seq in &sequences {
            offset += seq.chars().count();
            starts.push(offset);
        }

        Self { sequences, starts }
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.sequences.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sequences.iter().map(String::as_str)
    }

    /// Number of digits a complete response has to contain
    pub fn total_digits(&self) -> usize {
        self.starts.last().copied().unwrap_or(0)
    }

    /// Offset into the concatenated response for digit `pos` of sequence `seq_idx`.
    ///
    /// Sequences may differ in length when built by hand, so the offset comes
    /// from the prefix sums taken in [`SequenceSet::new`] rather than `seq_idx * len`.
    pub fn flattened_offset(&self, seq_idx: usize, pos: usize) -> Option<usize> {
        let start = *self.starts.get(seq_idx)?;
        let end = *self.starts.get(seq_idx + 1)?;
        if pos >= end - start {
            return None;
        }

        Some(start + pos)
    }

    /// Concatenation of every sequence, i.e. the perfect response
    pub fn flattened(&self) -> String {
        self.sequences.concat()
    }
}

impl Default for SequenceSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<String>> for SequenceSet {
    fn from(sequences: Vec<String>) -> Self {
        Self::new(sequences)
    }
}

/// Produces random digit sequences
pub struct SequenceGenerator {
    config: GenConfig,
}

impl SequenceGenerator {
    pub fn new(config: GenConfig) -> Self {
        Self { config }
    }

    /// Generate a fresh set with the thread-local RNG
    pub fn generate(&self) -> SequenceSet {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate a fresh set drawing every digit from `rng`
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> SequenceSet {
        let sequences = (0..self.config.sequence_count)
            .map(|_| random_digits(rng, self.config.digits_per_sequence))
            .collect();

        SequenceSet::new(sequences)
    }
}

fn random_digits<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
