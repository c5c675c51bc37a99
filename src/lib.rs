/*!
An action and instruction codec for OpenFlow switch tooling.

The crate translates between the OpenFlow 1.0 and 1.1 wire encodings of
actions (including the Nicira vendor extension family) and one flat
internal record stream, in both directions:

* `pull_openflow10` / `pull_openflow11_instructions` parse untrusted
  wire bytes into an [`Ofpacts`] stream, rejecting anything malformed
  without leaving partial output behind;
* `check` validates a decoded stream against a [`Flow`] context and a
  switch port count;
* `to_openflow10` / `to_openflow11` re-encode a stream into either wire
  dialect;
* `format` renders a stream as the conventional `actions=...` text.

Decoding and validation are deliberately separate passes: everything
knowable from the bytes alone is enforced while decoding, and everything
needing context waits for `check`. All entry points are pure and
synchronous; the only process-wide state is the rate limiter guarding
diagnostic log output.
*/

extern crate byteorder;
#[macro_use]
extern crate log;

#[macro_use]
mod diag;

pub mod actions;
pub mod error;
pub mod flow;
pub mod meta_flow;
pub mod ports;

pub use crate::actions::check::check;
pub use crate::actions::deserialize::{pull_openflow10, pull_openflow11_instructions};
pub use crate::actions::format::format;
pub use crate::actions::serialize::{to_openflow10, to_openflow11, InstructionType};
pub use crate::actions::{Compat, Ofpact, OfpactType, Ofpacts, Record, OFPACT_ALIGN};
pub use crate::error::{Error, Result};
pub use crate::flow::Flow;
pub use crate::meta_flow::{MfField, SubField};
