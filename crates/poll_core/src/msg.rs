#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// One-shot page initialization with every job element found on the page.
    Initialize(Vec<crate::JobElement>),
    /// A status response for one tick of a session.
    StatusReceived {
        key: crate::JobKey,
        tick: crate::Tick,
        report: crate::StatusReport,
    },
    /// A tick whose request failed at the transport or parse level.
    PollFailed {
        key: crate::JobKey,
        tick: crate::Tick,
        reason: String,
    },
}
