use bytes::Bytes;

use super::message::Message;
use crate::clock::VectorClock;
use crate::core::{Error, ProcessId, Result};

/// Text codec for clock frames of the shape `"<sender>-[c0,c1,c2]"`
///
/// Inbound bytes must pass [`validate`](FrameCodec::validate) before
/// [`parse`](FrameCodec::parse) is called; that ordering is a hard
/// call-order requirement, not an optimization. `parse` still refuses
/// rather than fabricating values when the contract is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCodec<const N: usize>;

impl<const N: usize> FrameCodec<N> {
    /// Creates a new frame codec
    pub fn new() -> Self {
        FrameCodec
    }

    /// Encodes a message into its exact wire form
    ///
    /// Deterministic and pure: the same message always yields the same
    /// bytes, with no surrounding whitespace.
    pub fn encode(&self, message: &Message<N>) -> Bytes {
        let mut text = String::with_capacity(8 + 12 * N);
        text.push_str(&message.sender.0.to_string());
        text.push_str("-[");
        for (i, counter) in message.clock.counters().iter().enumerate() {
            if i > 0 {
                text.push(',');
            }
            text.push_str(&counter.to_string());
        }
        text.push(']');
        Bytes::from(text)
    }

    /// Gates inbound bytes against the frame pattern
    ///
    /// Accepts exactly: one or more ASCII digits, `-`, `[`, N
    /// comma-separated digit runs, `]`, end of input. Noise, partial
    /// frames and empty buffers fail without panicking.
    pub fn validate(&self, frame: &[u8]) -> bool {
        self.match_pattern(frame).is_some()
    }

    fn match_pattern(&self, frame: &[u8]) -> Option<()> {
        let rest = eat_digits(frame)?;
        let rest = eat_byte(rest, b'-')?;
        let mut rest = eat_byte(rest, b'[')?;
        for i in 0..N {
            if i > 0 {
                rest = eat_byte(rest, b',')?;
            }
            rest = eat_digits(rest)?;
        }
        let rest = eat_byte(rest, b']')?;
        if rest.is_empty() {
            Some(())
        } else {
            None
        }
    }

    /// Decodes a validated frame into a message
    ///
    /// Locates the span between the first `[` and the first `]` after it
    /// and parses the comma-separated counters. Counters that do not fit
    /// the counter width are a codec error: the frame carries values this
    /// node cannot represent.
    pub fn parse(&self, frame: &[u8]) -> Result<Message<N>> {
        let text =
            std::str::from_utf8(frame).map_err(|_| Error::codec("frame is not ASCII text"))?;

        let open = text
            .find('[')
            .ok_or_else(|| Error::codec("missing '[' delimiter"))?;
        let close = text[open..]
            .find(']')
            .map(|i| open + i)
            .ok_or_else(|| Error::codec("missing ']' delimiter"))?;

        let sender = text[..open]
            .strip_suffix('-')
            .ok_or_else(|| Error::codec("missing '-' separator"))?
            .parse::<u32>()
            .map_err(|e| Error::codec(format!("bad sender id: {}", e)))?;

        let mut counters = [0u32; N];
        let mut fields = text[open + 1..close].split(',');
        for slot in counters.iter_mut() {
            let field = fields
                .next()
                .ok_or_else(|| Error::codec(format!("expected {} counters", N)))?;
            *slot = field
                .parse()
                .map_err(|e| Error::codec(format!("bad counter '{}': {}", field, e)))?;
        }
        if fields.next().is_some() {
            return Err(Error::codec(format!("expected {} counters", N)));
        }

        Ok(Message::new(ProcessId(sender), VectorClock::from(counters)))
    }
}

fn eat_digits(input: &[u8]) -> Option<&[u8]> {
    let end = input
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(input.len());
    if end == 0 {
        None
    } else {
        Some(&input[end..])
    }
}

fn eat_byte(input: &[u8], byte: u8) -> Option<&[u8]> {
    match input.first() {
        Some(b) if *b == byte => Some(&input[1..]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_exact_form() {
        let codec = FrameCodec::<3>::new();
        let message = Message::new(ProcessId(0), VectorClock::from([6, 2, 0]));
        assert_eq!(&codec.encode(&message)[..], b"0-[6,2,0]");
    }

    #[test]
    fn test_round_trip() {
        let codec = FrameCodec::<3>::new();
        let original = Message::new(ProcessId(12), VectorClock::from([0, u32::MAX, 451]));

        let frame = codec.encode(&original);
        assert!(codec.validate(&frame));
        let decoded = codec.parse(&frame).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_validate_accepts_reference_frame() {
        let codec = FrameCodec::<3>::new();
        assert!(codec.validate(b"2-[0,3,1]"));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let codec = FrameCodec::<3>::new();
        let rejected: [&[u8]; 10] = [
            b"",
            b"garbage",
            b"2-[0,3,1",     // missing closing bracket
            b"2-0,3,1]",     // missing opening bracket
            b"-[0,3,1]",     // missing sender id
            b"2-[0,3]",      // too few counters
            b"2-[0,3,1,9]",  // too many counters
            b"2-[0,x,1]",    // non-numeric field
            b"2-[0, 3, 1]",  // whitespace is not part of the frame
            b"2-[0,3,1] ",   // trailing bytes
        ];
        for frame in rejected {
            assert!(!codec.validate(frame), "accepted {:?}", frame);
        }
    }

    #[test]
    fn test_parse_reference_frame() {
        let codec = FrameCodec::<3>::new();
        let message = codec.parse(b"2-[0,3,1]").unwrap();
        assert_eq!(message.sender, ProcessId(2));
        assert_eq!(message.clock.counters(), &[0, 3, 1]);
    }

    #[test]
    fn test_parse_rejects_unrepresentable_counter() {
        // Passes the textual gate but overflows the counter width.
        let codec = FrameCodec::<3>::new();
        let frame: &[u8] = b"1-[4294967296,0,0]";
        assert!(codec.validate(frame));
        let err = codec.parse(frame).unwrap_err();
        assert!(matches!(err, Error::Codec(_)));
    }

    #[test]
    fn test_parse_refuses_unvalidated_garbage() {
        let codec = FrameCodec::<3>::new();
        assert!(codec.parse(b"garbage").is_err());
        assert!(codec.parse(b"").is_err());
        assert!(codec.parse(&[0xff, 0xfe, b'[', b']']).is_err());
    }

    #[test]
    fn test_width_is_part_of_the_pattern() {
        let narrow = FrameCodec::<2>::new();
        assert!(narrow.validate(b"2-[0,3]"));
        assert!(!narrow.validate(b"2-[0,3,1]"));
    }
}
