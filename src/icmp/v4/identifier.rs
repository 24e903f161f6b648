type IdentifierInnerType = u16;

/// ICMP echo identifier, the "port number" of a ping session: replies
/// carrying a different identifier belong to some other process.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Identifier(pub IdentifierInnerType);

impl Identifier {
    /// Identifier derived from the current process so replies can be told
    /// apart from other ICMP traffic on the host.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn from_process() -> Self {
        Identifier(std::process::id() as IdentifierInnerType)
    }
}

impl From<IdentifierInnerType> for Identifier {
    fn from(value: IdentifierInnerType) -> Self {
        Identifier(value)
    }
}

impl From<Identifier> for IdentifierInnerType {
    fn from(value: Identifier) -> Self {
        value.0
    }
}
