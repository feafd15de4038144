//! Frame types for the outbound stream.
//!
//! Defines the units handed from the pacer to the connection session.

/// One transmission unit of mono samples at the target rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Sequence number, starting at 0 for the first frame of a run.
    pub sequence: u64,
    /// Mono `f32` samples.
    pub samples: Vec<f32>,
}

impl Frame {
    /// Creates a new frame.
    pub fn new(sequence: u64, samples: Vec<f32>) -> Self {
        Self { sequence, samples }
    }

    /// Returns the duration of this frame in milliseconds.
    pub fn duration_ms(&self, sample_rate: u32) -> u64 {
        (self.samples.len() as u64 * 1000) / sample_rate as u64
    }

    /// Encodes the samples as little-endian IEEE-754 `f32`, no header.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// What the pacer hands to the session, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Audio frame.
    Frame(Frame),
    /// End of utterance; always the last item of a run.
    Flush,
}

impl Outbound {
    /// Returns true if this is the flush marker.
    pub fn is_flush(&self) -> bool {
        matches!(self, Outbound::Flush)
    }

    /// Extracts the frame if this is a Frame variant.
    pub fn into_frame(self) -> Option<Frame> {
        match self {
            Outbound::Frame(f) => Some(f),
            Outbound::Flush => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        let frame = Frame::new(0, vec![0.0; 16000]);
        assert_eq!(frame.duration_ms(16000), 1000);

        let short = Frame::new(1, vec![0.0; 4000]);
        assert_eq!(short.duration_ms(16000), 250);
    }

    #[test]
    fn test_frame_encodes_little_endian_f32() {
        let frame = Frame::new(0, vec![1.0, -0.5]);
        let bytes = frame.to_le_bytes();

        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x80, 0x3f]);
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0xbf]);
    }

    #[test]
    fn test_empty_frame_encodes_to_nothing() {
        assert!(Frame::new(0, Vec::new()).to_le_bytes().is_empty());
    }

    #[test]
    fn test_outbound_variants() {
        let frame = Outbound::Frame(Frame::new(3, vec![0.25]));
        assert!(!frame.is_flush());
        assert_eq!(frame.into_frame().map(|f| f.sequence), Some(3));

        let flush = Outbound::Flush;
        assert!(flush.is_flush());
        assert_eq!(flush.into_frame(), None);
    }
}
