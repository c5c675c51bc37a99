/*!
The shared errors across the action and instruction codecs.
*/

use std::error;
use std::fmt;
use std::result;

/// Represents all errors that can occur while decoding, validating
/// or re-encoding OpenFlow actions and instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An action or instruction length field is misaligned,
    /// inconsistent with its type, or exceeds the remaining span
    BadLen,
    /// An unknown or obsolete action type
    BadType,
    /// A vendor action carries a vendor id other than the Nicira id
    BadVendor,
    /// A reserved field is non-zero or a value is outside its permitted range
    BadArgument,
    /// An output port is out of range and not a recognized reserved port
    BadOutPort,
    /// An unknown instruction type
    UnknownInst,
    /// A known instruction type that is not supported
    UnsupInst,
    /// The same instruction type occurs twice in one instruction block
    DupType,
    /// An experimenter instruction, which is never accepted
    BadExperimenter,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Error::BadLen => "bad action or instruction length",
            Error::BadType => "unknown or obsolete action type",
            Error::BadVendor => "unknown vendor id in vendor action",
            Error::BadArgument => "reserved field not zero or value out of range",
            Error::BadOutPort => "invalid output port",
            Error::UnknownInst => "unknown instruction type",
            Error::UnsupInst => "unsupported instruction type",
            Error::DupType => "duplicate instruction type",
            Error::BadExperimenter => "experimenter instructions are not accepted",
        };
        write!(f, "{}", msg)
    }
}

impl error::Error for Error {}

/// The Result for operations that can fail with a codec error
pub type Result<T> = result::Result<T, Error>;
