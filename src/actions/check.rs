/*!
Semantic validation of a decoded action stream.

Wire decoding already enforced everything knowable from the bytes
alone. What remains needs context: the switch's port count bounds
output ports, and sub-field references depend on the flow's match
prerequisites. The first failing record aborts the walk.
*/

use crate::error::{Error, Result};
use crate::flow::Flow;
use crate::meta_flow;
use crate::ports::{self, OFPP_IN_PORT, OFPP_LOCAL};

use super::{autopath, bundle, learn, multipath, reg};
use super::{Ofpact, Ofpacts, Record};

/// Checks that `acts` is valid for a packet matching `flow` on a switch
/// with `max_ports` ports.
pub fn check(acts: &Ofpacts, flow: &Flow, max_ports: u16) -> Result<()> {
    for rec in acts.iter() {
        check_one(&rec, flow, max_ports)?;
    }
    Ok(())
}

fn check_one(rec: &Record, flow: &Flow, max_ports: u16) -> Result<()> {
    match rec.action {
        Ofpact::Output { port, .. } => ports::check_output_port(port, max_ports),
        Ofpact::Enqueue { port, .. } => {
            if port >= max_ports && port != OFPP_IN_PORT && port != OFPP_LOCAL {
                Err(Error::BadOutPort)
            } else {
                Ok(())
            }
        }
        Ofpact::OutputReg { ref src, .. } => meta_flow::check_src(src, Some(flow)),
        Ofpact::Bundle {
            ref dst,
            ref slaves,
            ..
        } => bundle::check(dst.as_ref(), slaves, flow, max_ports),
        Ofpact::RegMove { ref src, ref dst } => reg::move_check(src, dst, flow),
        Ofpact::RegLoad { ref dst, .. } => reg::load_check(dst, flow),
        Ofpact::Learn { specs, .. } => learn::check(specs, flow),
        Ofpact::Multipath { ref dst, .. } => multipath::check(dst, flow),
        Ofpact::Autopath { ref dst, .. } => autopath::check(dst, flow),
        Ofpact::Controller { .. }
        | Ofpact::SetVlanVid(..)
        | Ofpact::SetVlanPcp(..)
        | Ofpact::StripVlan
        | Ofpact::SetEthSrc(..)
        | Ofpact::SetEthDst(..)
        | Ofpact::SetIpv4Src(..)
        | Ofpact::SetIpv4Dst(..)
        | Ofpact::SetIpv4Dscp(..)
        | Ofpact::SetL4SrcPort(..)
        | Ofpact::SetL4DstPort(..)
        | Ofpact::SetTunnel(..)
        | Ofpact::SetQueue(..)
        | Ofpact::PopQueue
        | Ofpact::DecTtl
        | Ofpact::FinTimeout { .. }
        | Ofpact::Resubmit { .. }
        | Ofpact::Note(..)
        | Ofpact::Exit => Ok(()),
    }
}
