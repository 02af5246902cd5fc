// Protothread position state and lifecycle trait
//
// A protothread carries exactly one word of execution state: the token
// of the suspension point its body last reached. 0 means the body has
// not started; u16::MAX marks termination. Every other value is a token
// minted by pt_body! for one suspension statement in that body, so the
// position always names a point the body itself reached.

use core::fmt;

/// Resumption position of one protothread body — Dunkels' "local
/// continuation". Held as a field by every [`Protothread`] impl and
/// driven by the [`pt_body!`](crate::pt_body) expansion.
#[derive(Debug)]
pub struct Pt {
    pos: u16,
}

impl Pt {
    /// Body has not started; the next step enters at the top.
    pub const NOT_STARTED: u16 = 0;

    /// Body ended or was stopped. Distinct from every valid token.
    pub const TERMINATED: u16 = u16::MAX;

    pub const fn new() -> Self {
        Self {
            pos: Self::NOT_STARTED,
        }
    }

    /// Force the position back to the body start, from any state.
    /// Does not run the body.
    pub fn restart(&mut self) {
        self.pos = Self::NOT_STARTED;
    }

    /// Force termination, from any state. Idempotent. Happens on its
    /// own when the body runs off its end.
    pub fn stop(&mut self) {
        self.pos = Self::TERMINATED;
    }

    /// True until the thread terminates — including before the first
    /// step.
    pub fn is_running(&self) -> bool {
        self.pos != Self::TERMINATED
    }

    pub fn state(&self) -> State {
        match self.pos {
            Self::NOT_STARTED => State::NotStarted,
            Self::TERMINATED => State::Terminated,
            token => State::Suspended(token),
        }
    }

    // raw/jump are pt_body! plumbing, not part of the public surface.

    #[doc(hidden)]
    #[inline]
    pub fn raw(&self) -> u16 {
        self.pos
    }

    #[doc(hidden)]
    #[inline]
    pub fn jump(&mut self, token: u16) {
        self.pos = token;
    }
}

impl Default for Pt {
    fn default() -> Self {
        Self::new()
    }
}

/// Observable lifecycle state decoded from the position word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    NotStarted,
    /// Parked at the suspension point identified by the token.
    Suspended(u16),
    Terminated,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::NotStarted => write!(f, "not started"),
            State::Suspended(token) => write!(f, "suspended@{}", token),
            State::Terminated => write!(f, "terminated"),
        }
    }
}

/// A stackless, resumable unit of work.
///
/// Implementors hold a [`Pt`] field plus whatever state must survive
/// suspension — nothing on the stack does, so any "arguments" live as
/// fields. The body of [`step`](Protothread::step) is written with
/// [`pt_body!`](crate::pt_body).
///
/// `step` takes `&mut self`, which is the whole concurrency story:
/// exactly one call can be active on a unit at a time, and a child held
/// as a field can only be advanced from within its owner's step.
pub trait Protothread {
    /// The position word backing this thread.
    fn pt(&self) -> &Pt;

    fn pt_mut(&mut self) -> &mut Pt;

    /// Run the body from the last suspension point to the next one, or
    /// to the end. Returns true while the thread is still running,
    /// false once it has just terminated. Never blocks: an unmet wait
    /// condition is polled once and control returns immediately.
    ///
    /// Safe to call after termination — no body work runs and the call
    /// returns false.
    fn step(&mut self) -> bool;

    /// Rewind to the body start. The next [`step`](Protothread::step)
    /// re-enters at the top.
    fn restart(&mut self) {
        log::trace!("{}: restart", core::any::type_name::<Self>());
        self.pt_mut().restart();
    }

    /// Terminate now. Idempotent; callable between driver steps or by
    /// the owner at any time.
    fn stop(&mut self) {
        log::trace!("{}: stop", core::any::type_name::<Self>());
        self.pt_mut().stop();
    }

    /// True while the thread is running or waiting, false once it has
    /// ended or exited.
    fn is_running(&self) -> bool {
        self.pt().is_running()
    }
}
