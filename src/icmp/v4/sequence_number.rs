type SequenceNumberInnerType = u16;

#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct SequenceNumber(pub SequenceNumberInnerType);

impl From<SequenceNumberInnerType> for SequenceNumber {
    fn from(value: SequenceNumberInnerType) -> Self {
        SequenceNumber(value)
    }
}

impl From<SequenceNumber> for SequenceNumberInnerType {
    fn from(value: SequenceNumber) -> Self {
        value.0
    }
}

/// Hands out echo sequence numbers for the whole lifetime of a session.
/// Never reset between bursts, so two consecutive bursts cannot reuse a
/// number until the counter wraps at `u16::MAX`.
pub(crate) struct SequenceCounter(SequenceNumberInnerType);

impl SequenceCounter {
    pub(crate) fn new() -> Self {
        SequenceCounter(0)
    }

    pub(crate) fn next(&mut self) -> SequenceNumber {
        let current = SequenceNumber(self.0);
        self.0 = self.0.wrapping_add(1);
        current
    }
}
