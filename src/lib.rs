// smol-thread: minimal no_std stackless protothreads.
// thread: position word (Pt), observable State, Protothread trait
// macros: pt_body! body compiler, pt_exit! / pt_restart!

//! Stackless cooperative threads in one `u16` of state.
//!
//! A protothread is a unit of work that can suspend mid-body and
//! resume exactly there on a later call, without a stack, a heap
//! allocation, or an async runtime. An external driver calls
//! [`step`](Protothread::step) as often as it likes; each call either
//! returns immediately because a wait condition is unmet, or advances
//! to the next suspension point or the end. Threads compose into
//! trees: a parent delegates a span of its body to an owned child with
//! `spawn`/`wait_thread`, one child step per parent step.
//!
//! The cost model is fixed and statically known: per thread, one `u16`
//! position word plus whatever fields the body needs. Locals do not
//! survive suspension, so persistent state lives in those fields.
//!
//! ```
//! use smol_thread::{pt_body, Protothread, Pt};
//!
//! struct Sequencer {
//!     pt: Pt,
//!     phase: u8,
//! }
//!
//! impl Protothread for Sequencer {
//!     fn pt(&self) -> &Pt {
//!         &self.pt
//!     }
//!
//!     fn pt_mut(&mut self) -> &mut Pt {
//!         &mut self.pt
//!     }
//!
//!     fn step(&mut self) -> bool {
//!         pt_body!(self.pt, {
//!             self.phase = 1;
//!             yield;
//!             self.phase = 2;
//!             yield;
//!             self.phase = 3;
//!         })
//!     }
//! }
//!
//! let mut seq = Sequencer { pt: Pt::new(), phase: 0 };
//! assert!(seq.step());
//! assert_eq!(seq.phase, 1);
//! assert!(seq.step());
//! assert_eq!(seq.phase, 2);
//! assert!(!seq.step()); // ran off the end
//! assert_eq!(seq.phase, 3);
//! assert!(!seq.is_running());
//! ```

#![cfg_attr(not(test), no_std)]

pub mod thread;

mod macros;

pub use thread::{Protothread, Pt, State};
