/*!
OpenFlow port numbers and the helpers shared by both action dialects.

Internally all ports are kept in the 16-bit OpenFlow 1.0 space. OpenFlow
1.1 uses 32-bit port numbers with its reserved range shifted upwards, so
its decoder and encoder pass every port through the bridge functions
here.
*/

use crate::error::{Error, Result};

/// Maximum number of physical switch ports. Everything at or above this
/// value is reserved.
pub const OFPP_MAX: u16 = 0xff00;
/// Send the packet out the port it came in on.
pub const OFPP_IN_PORT: u16 = 0xfff8;
/// Submit the packet to the flow table (packet-out only).
pub const OFPP_TABLE: u16 = 0xfff9;
/// Process with normal L2/L3 switching.
pub const OFPP_NORMAL: u16 = 0xfffa;
/// All ports except the input port and ports disabled for flooding.
pub const OFPP_FLOOD: u16 = 0xfffb;
/// All ports except the input port.
pub const OFPP_ALL: u16 = 0xfffc;
/// Send to the controller.
pub const OFPP_CONTROLLER: u16 = 0xfffd;
/// The local networking stack of the switch.
pub const OFPP_LOCAL: u16 = 0xfffe;
/// Not a port; wildcards the port in flow deletions.
pub const OFPP_NONE: u16 = 0xffff;

/// Maximum number of physical switch ports in the OpenFlow 1.1 space.
pub const OFPP11_MAX: u32 = 0xffff_ff00;
/// Distance between the 1.0 and 1.1 reserved port ranges.
const OFPP11_OFFSET: u32 = 0xffff_0000;

/// Checks whether `port` may appear in an output action on a switch with
/// `max_ports` ports. The named reserved ports are always acceptable;
/// `OFPP_NONE` never is.
pub fn check_output_port(port: u16, max_ports: u16) -> Result<()> {
    match port {
        OFPP_IN_PORT | OFPP_TABLE | OFPP_NORMAL | OFPP_FLOOD | OFPP_ALL | OFPP_CONTROLLER
        | OFPP_LOCAL => Ok(()),
        _ => {
            if port < max_ports {
                Ok(())
            } else {
                Err(Error::BadOutPort)
            }
        }
    }
}

/// Translates an OpenFlow 1.1 port number into the internal 16-bit space.
pub fn port_from_ofp11(port: u32) -> Result<u16> {
    if port < u32::from(OFPP_MAX) {
        Ok(port as u16)
    } else if port >= OFPP11_OFFSET + u32::from(OFPP_MAX) {
        Ok((port - OFPP11_OFFSET) as u16)
    } else {
        Err(Error::BadOutPort)
    }
}

/// Translates an internal 16-bit port number into the OpenFlow 1.1 space.
pub fn port_to_ofp11(port: u16) -> u32 {
    if port < OFPP_MAX {
        u32::from(port)
    } else {
        u32::from(port) + OFPP11_OFFSET
    }
}

/// Appends the conventional name of `port`, or its number if it has none.
pub fn format_port(port: u16, s: &mut String) {
    let name = match port {
        OFPP_IN_PORT => "IN_PORT",
        OFPP_TABLE => "TABLE",
        OFPP_NORMAL => "NORMAL",
        OFPP_FLOOD => "FLOOD",
        OFPP_ALL => "ALL",
        OFPP_CONTROLLER => "CONTROLLER",
        OFPP_LOCAL => "LOCAL",
        OFPP_NONE => "NONE",
        n => {
            s.push_str(&n.to_string());
            return;
        }
    };
    s.push_str(name);
}
