// pt_body!: compiles a protothread body into its position state machine
//
// The body is a linear sequence of plain Rust statements broken up by
// suspension keywords. Expansion produces `loop { match pos { .. } }`
// with one arm per suspension point plus the entry arm; an arm that
// does not return advances the position and lets the loop re-dispatch,
// which stands in for switch fallthrough. The default arm re-asserts
// TERMINATED, so stepping a finished thread is a no-op that returns
// false.
//
// Tokens are allocated by the muncher itself: each suspension point
// appends a `1` to an accumulator and is keyed by the running sum.
// Uniqueness within a body is therefore structural — two points on one
// source line, or points introduced through further macro composition,
// never collide the way a line-number scheme would.

/// Compile a protothread body.
///
/// Use as the tail expression of [`Protothread::step`](crate::Protothread::step).
/// The first argument is the thread's [`Pt`](crate::Pt) field; the block
/// holds ordinary statements interleaved with suspension keywords:
///
/// | keyword                | behavior |
/// |------------------------|----------|
/// | `wait_until(cond);`    | park here until `cond` is true; falls through in the same call once it is |
/// | `wait_while(cond);`    | park here while `cond` is true |
/// | `yield;`               | give up exactly one call, then fall through |
/// | `yield_until(cond);`   | give up at least one call, then behave like `wait_until` |
/// | `wait_thread(child);`  | step `child` once per call until it terminates |
/// | `spawn(child);`        | restart `child`, then `wait_thread(child);` |
///
/// Conditions are re-evaluated on every call that resumes at their
/// point, and must be side-effect-free. `child` is a field implementing
/// [`Protothread`](crate::Protothread). Running off the end of the
/// block terminates the thread. [`pt_exit!`] and [`pt_restart!`] may
/// appear anywhere inside the plain statements.
///
/// Locals do not survive suspension — state that must persist across a
/// keyword lives in the thread's fields. The expansion munches the body
/// one token at a time; a very long body may need a higher
/// `#![recursion_limit]`.
///
/// ```
/// use smol_thread::{pt_body, Protothread, Pt};
///
/// struct Handshake {
///     pt: Pt,
///     request: bool, // set by the driver
///     granted: bool, // set by the body
///     acked: bool,   // set by the driver
/// }
///
/// impl Protothread for Handshake {
///     fn pt(&self) -> &Pt {
///         &self.pt
///     }
///
///     fn pt_mut(&mut self) -> &mut Pt {
///         &mut self.pt
///     }
///
///     fn step(&mut self) -> bool {
///         pt_body!(self.pt, {
///             wait_until(self.request);
///             self.granted = true;
///             wait_until(self.acked);
///         })
///     }
/// }
///
/// let mut h = Handshake { pt: Pt::new(), request: false, granted: false, acked: false };
/// assert!(h.step()); // parked: no request yet
/// h.request = true;
/// assert!(h.step()); // grant issued, now parked on the ack
/// assert!(h.granted);
/// h.acked = true;
/// assert!(!h.step()); // ran off the end: terminated
/// assert!(!h.is_running());
/// ```
#[macro_export]
macro_rules! pt_body {
    ($pt:expr, { $($body:tt)* }) => {
        $crate::__pt_body! {
            pt = ($pt),
            ones = [],
            arms = [],
            cur = (0) (),
            rest = { $($body)* }
        }
    };
}

/// Stop the thread and return from `step` immediately ("not running").
///
/// Usable anywhere inside a [`pt_body!`] statement, including nested
/// control flow. Takes the thread's `Pt` field.
#[macro_export]
macro_rules! pt_exit {
    ($pt:expr) => {{
        $pt.stop();
        return false;
    }};
}

/// Rewind to the body start and return from `step` ("still running").
/// The next external call re-enters at the top — no internal recursion.
#[macro_export]
macro_rules! pt_restart {
    ($pt:expr) => {{
        $pt.restart();
        return true;
    }};
}

// Muncher state:
//   pt    — the Pt field expression
//   ones  — one `1` per suspension point seen so far; the running sum
//           is the token of the most recent point
//   arms  — finished match arms
//   cur   — (pattern of the arm being built) (its statements so far)
//   rest  — unconsumed body tokens
//
// Every suspension keyword closes the current arm with a transition
// into the new token and opens the new arm with that point's resume
// check. Anything else is a plain token appended to the current arm.
#[doc(hidden)]
#[macro_export]
macro_rules! __pt_body {
    // wait_until: record the token, then gate on the condition in the
    // same call; the condition is re-checked on every resume.
    (pt = ($pt:expr), ones = [$($n:tt)*], arms = [$($arms:tt)*],
     cur = ($($pat:tt)*) ($($stmts:tt)*),
     rest = { wait_until ($cond:expr) ; $($rest:tt)* }) => {
        $crate::__pt_body! {
            pt = ($pt),
            ones = [$($n)* 1],
            arms = [$($arms)*
                $($pat)* => {
                    $($stmts)*
                    $pt.jump(0u16 $(+ $n)* + 1);
                }
            ],
            cur = (__pt_pos if __pt_pos == 0u16 $(+ $n)* + 1)
                  (if !($cond) {
                      return true;
                  }),
            rest = { $($rest)* }
        }
    };

    (pt = ($pt:expr), ones = [$($n:tt)*], arms = [$($arms:tt)*],
     cur = ($($pat:tt)*) ($($stmts:tt)*),
     rest = { wait_while ($cond:expr) ; $($rest:tt)* }) => {
        $crate::__pt_body! {
            pt = ($pt),
            ones = [$($n)* 1],
            arms = [$($arms)*
                $($pat)* => {
                    $($stmts)*
                    $pt.jump(0u16 $(+ $n)* + 1);
                }
            ],
            cur = (__pt_pos if __pt_pos == 0u16 $(+ $n)* + 1)
                  (if $cond {
                      return true;
                  }),
            rest = { $($rest)* }
        }
    };

    // yield: the reaching call records the token and returns before the
    // arm is entered, so the next call falls straight through.
    (pt = ($pt:expr), ones = [$($n:tt)*], arms = [$($arms:tt)*],
     cur = ($($pat:tt)*) ($($stmts:tt)*),
     rest = { yield ; $($rest:tt)* }) => {
        $crate::__pt_body! {
            pt = ($pt),
            ones = [$($n)* 1],
            arms = [$($arms)*
                $($pat)* => {
                    $($stmts)*
                    $pt.jump(0u16 $(+ $n)* + 1);
                    return true;
                }
            ],
            cur = (__pt_pos if __pt_pos == 0u16 $(+ $n)* + 1) (),
            rest = { $($rest)* }
        }
    };

    // yield_until: mandatory first suspension, then wait_until.
    (pt = ($pt:expr), ones = [$($n:tt)*], arms = [$($arms:tt)*],
     cur = ($($pat:tt)*) ($($stmts:tt)*),
     rest = { yield_until ($cond:expr) ; $($rest:tt)* }) => {
        $crate::__pt_body! {
            pt = ($pt),
            ones = [$($n)* 1],
            arms = [$($arms)*
                $($pat)* => {
                    $($stmts)*
                    $pt.jump(0u16 $(+ $n)* + 1);
                    return true;
                }
            ],
            cur = (__pt_pos if __pt_pos == 0u16 $(+ $n)* + 1)
                  (if !($cond) {
                      return true;
                  }),
            rest = { $($rest)* }
        }
    };

    // wait_thread: one child step per call until the child terminates.
    (pt = ($pt:expr), ones = [$($n:tt)*], arms = [$($arms:tt)*],
     cur = ($($pat:tt)*) ($($stmts:tt)*),
     rest = { wait_thread ($child:expr) ; $($rest:tt)* }) => {
        $crate::__pt_body! {
            pt = ($pt),
            ones = [$($n)* 1],
            arms = [$($arms)*
                $($pat)* => {
                    $($stmts)*
                    $pt.jump(0u16 $(+ $n)* + 1);
                }
            ],
            cur = (__pt_pos if __pt_pos == 0u16 $(+ $n)* + 1)
                  (if $crate::Protothread::step(&mut $child) {
                      return true;
                  }),
            rest = { $($rest)* }
        }
    };

    // spawn: force the child back to its start at the moment of
    // delegation, whatever state it was left in, then wait_thread.
    (pt = ($pt:expr), ones = [$($n:tt)*], arms = [$($arms:tt)*],
     cur = ($($pat:tt)*) ($($stmts:tt)*),
     rest = { spawn ($child:expr) ; $($rest:tt)* }) => {
        $crate::__pt_body! {
            pt = ($pt),
            ones = [$($n)* 1],
            arms = [$($arms)*
                $($pat)* => {
                    $($stmts)*
                    $crate::Protothread::restart(&mut $child);
                    $pt.jump(0u16 $(+ $n)* + 1);
                }
            ],
            cur = (__pt_pos if __pt_pos == 0u16 $(+ $n)* + 1)
                  (if $crate::Protothread::step(&mut $child) {
                      return true;
                  }),
            rest = { $($rest)* }
        }
    };

    // Plain token: part of the current arm's statements.
    (pt = ($pt:expr), ones = [$($n:tt)*], arms = [$($arms:tt)*],
     cur = ($($pat:tt)*) ($($stmts:tt)*),
     rest = { $t:tt $($rest:tt)* }) => {
        $crate::__pt_body! {
            pt = ($pt),
            ones = [$($n)*],
            arms = [$($arms)*],
            cur = ($($pat)*) ($($stmts)* $t),
            rest = { $($rest)* }
        }
    };

    // Body exhausted: close the last arm with the end-marker (falling
    // off the end terminates) and emit the dispatch loop. The default
    // arm catches TERMINATED and re-asserts it.
    (pt = ($pt:expr), ones = [$($n:tt)*], arms = [$($arms:tt)*],
     cur = ($($pat:tt)*) ($($stmts:tt)*),
     rest = { }) => {
        loop {
            match $pt.raw() {
                $($arms)*
                $($pat)* => {
                    $($stmts)*
                    $pt.stop();
                    return false;
                }
                _ => {
                    $pt.stop();
                    return false;
                }
            }
        }
    };
}
