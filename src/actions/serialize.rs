/*!
Re-encoding internal records into wire actions.

Each encoder walks the record stream and appends the corresponding wire
structs to the caller's buffer. Records with a native encoding in the
target dialect use it; everything else goes out as a Nicira vendor
action. The `compat` tag breaks ties between equivalent wire shapes, so
a decode/encode cycle reproduces the source encoding.
*/

use byteorder::{ByteOrder, NetworkEndian};

use crate::diag::RateLimit;
use crate::meta_flow::encode_ofs_nbits;
use crate::ports;

use super::wire::*;
use super::{autopath, bundle, learn, multipath, reg};
use super::{Compat, Ofpact, Ofpacts, Record};

static RL: RateLimit = RateLimit::new(1, 5);

/// The OpenFlow 1.1 instruction kinds an action stream can be wrapped
/// in. Only `ApplyActions` has an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionType {
    GotoTable,
    WriteMetadata,
    WriteActions,
    ApplyActions,
    ClearActions,
}

/// Appends `acts` to `out` as OpenFlow 1.0 actions.
pub fn to_openflow10(acts: &Ofpacts, out: &mut Vec<u8>) {
    for rec in acts.iter() {
        action_to_openflow10(&rec, out);
    }
}

fn put_action_header(out: &mut Vec<u8>, typ: u16, len: usize) {
    put_u16::<NetworkEndian>(out, typ);
    put_u16::<NetworkEndian>(out, len as u16);
}

fn action_to_openflow10(rec: &Record, out: &mut Vec<u8>) {
    match rec.action {
        Ofpact::Output { port, max_len } => {
            put_action_header(out, OFPAT10_OUTPUT, OFP10_ACTION_OUTPUT_LEN);
            put_u16::<NetworkEndian>(out, port);
            put_u16::<NetworkEndian>(out, max_len);
        }
        Ofpact::Enqueue { port, queue } => {
            put_action_header(out, OFPAT10_ENQUEUE, OFP_ACTION_ENQUEUE_LEN);
            put_u16::<NetworkEndian>(out, port);
            put_zeros(out, 6);
            put_u32::<NetworkEndian>(out, queue);
        }
        Ofpact::SetVlanVid(vid) => {
            put_action_header(out, OFPAT10_SET_VLAN_VID, OFP_ACTION_VLAN_VID_LEN);
            put_u16::<NetworkEndian>(out, vid);
            put_zeros(out, 2);
        }
        Ofpact::SetVlanPcp(pcp) => {
            put_action_header(out, OFPAT10_SET_VLAN_PCP, OFP_ACTION_VLAN_PCP_LEN);
            out.push(pcp);
            put_zeros(out, 3);
        }
        Ofpact::StripVlan => {
            put_action_header(out, OFPAT10_STRIP_VLAN, OFP_ACTION_HEADER_LEN);
            put_zeros(out, 4);
        }
        Ofpact::SetEthSrc(mac) => {
            put_action_header(out, OFPAT10_SET_DL_SRC, OFP_ACTION_DL_ADDR_LEN);
            out.extend_from_slice(&mac);
            put_zeros(out, 6);
        }
        Ofpact::SetEthDst(mac) => {
            put_action_header(out, OFPAT10_SET_DL_DST, OFP_ACTION_DL_ADDR_LEN);
            out.extend_from_slice(&mac);
            put_zeros(out, 6);
        }
        Ofpact::SetIpv4Src(ip) => {
            put_action_header(out, OFPAT10_SET_NW_SRC, OFP_ACTION_NW_ADDR_LEN);
            put_u32::<NetworkEndian>(out, ip);
        }
        Ofpact::SetIpv4Dst(ip) => {
            put_action_header(out, OFPAT10_SET_NW_DST, OFP_ACTION_NW_ADDR_LEN);
            put_u32::<NetworkEndian>(out, ip);
        }
        Ofpact::SetIpv4Dscp(dscp) => {
            put_action_header(out, OFPAT10_SET_NW_TOS, OFP_ACTION_NW_TOS_LEN);
            out.push(dscp);
            put_zeros(out, 3);
        }
        Ofpact::SetL4SrcPort(port) => {
            put_action_header(out, OFPAT10_SET_TP_SRC, OFP_ACTION_TP_PORT_LEN);
            put_u16::<NetworkEndian>(out, port);
            put_zeros(out, 2);
        }
        Ofpact::SetL4DstPort(port) => {
            put_action_header(out, OFPAT10_SET_TP_DST, OFP_ACTION_TP_PORT_LEN);
            put_u16::<NetworkEndian>(out, port);
            put_zeros(out, 2);
        }
        Ofpact::Controller { .. }
        | Ofpact::OutputReg { .. }
        | Ofpact::Bundle { .. }
        | Ofpact::SetTunnel(..)
        | Ofpact::SetQueue(..)
        | Ofpact::PopQueue
        | Ofpact::RegMove { .. }
        | Ofpact::RegLoad { .. }
        | Ofpact::DecTtl
        | Ofpact::FinTimeout { .. }
        | Ofpact::Resubmit { .. }
        | Ofpact::Learn { .. }
        | Ofpact::Multipath { .. }
        | Ofpact::Autopath { .. }
        | Ofpact::Note(..)
        | Ofpact::Exit => action_to_nxast(rec, out),
    }
}

/// Encodes a record that has no native OpenFlow representation as a
/// Nicira vendor action.
fn action_to_nxast(rec: &Record, out: &mut Vec<u8>) {
    match rec.action {
        Ofpact::Controller {
            max_len,
            controller_id,
            reason,
        } => {
            put_nx_header(out, NXAST_CONTROLLER, NX_ACTION_CONTROLLER_LEN);
            put_u16::<NetworkEndian>(out, max_len);
            put_u16::<NetworkEndian>(out, controller_id);
            out.push(reason);
            out.push(0);
        }
        Ofpact::OutputReg { ref src, max_len } => {
            put_nx_header(out, NXAST_OUTPUT_REG, NX_ACTION_OUTPUT_REG_LEN);
            put_u16::<NetworkEndian>(out, encode_ofs_nbits(src.ofs, src.n_bits));
            put_u32::<NetworkEndian>(out, src.field.nxm_header());
            put_u16::<NetworkEndian>(out, max_len);
            put_zeros(out, 6);
        }
        Ofpact::Bundle {
            algorithm,
            hash_fields,
            basis,
            ref dst,
            ref slaves,
        } => bundle::to_wire(algorithm, hash_fields, basis, dst.as_ref(), slaves, out),
        Ofpact::SetTunnel(tun_id) => {
            // keep the 64-bit shape the id arrived in
            if tun_id <= u64::from(u32::max_value()) && rec.compat != Compat::SetTunnel64 {
                put_nx_header(out, NXAST_SET_TUNNEL, NX_ACTION_SET_TUNNEL_LEN);
                put_zeros(out, 2);
                put_u32::<NetworkEndian>(out, tun_id as u32);
            } else {
                put_nx_header(out, NXAST_SET_TUNNEL64, NX_ACTION_SET_TUNNEL64_LEN);
                put_zeros(out, 6);
                put_u64::<NetworkEndian>(out, tun_id);
            }
        }
        Ofpact::SetQueue(queue_id) => {
            put_nx_header(out, NXAST_SET_QUEUE, NX_ACTION_SET_QUEUE_LEN);
            put_zeros(out, 2);
            put_u32::<NetworkEndian>(out, queue_id);
        }
        Ofpact::PopQueue => {
            put_nx_header(out, NXAST_POP_QUEUE, NX_ACTION_POP_QUEUE_LEN);
            put_zeros(out, 6);
        }
        Ofpact::RegMove { ref src, ref dst } => reg::move_to_wire(src, dst, out),
        Ofpact::RegLoad { ref dst, value } => reg::load_to_wire(dst, value, out),
        Ofpact::DecTtl => {
            put_nx_header(out, NXAST_DEC_TTL, NX_ACTION_HEADER_LEN);
            put_zeros(out, 6);
        }
        Ofpact::FinTimeout {
            idle_timeout,
            hard_timeout,
        } => {
            put_nx_header(out, NXAST_FIN_TIMEOUT, NX_ACTION_FIN_TIMEOUT_LEN);
            put_u16::<NetworkEndian>(out, idle_timeout);
            put_u16::<NetworkEndian>(out, hard_timeout);
            put_zeros(out, 2);
        }
        Ofpact::Resubmit { in_port, table_id } => {
            // the short form covers only the "same table" case
            if table_id == 0xff && rec.compat != Compat::ResubmitTable {
                put_nx_header(out, NXAST_RESUBMIT, NX_ACTION_RESUBMIT_LEN);
                put_u16::<NetworkEndian>(out, in_port);
                put_zeros(out, 4);
            } else {
                put_nx_header(out, NXAST_RESUBMIT_TABLE, NX_ACTION_RESUBMIT_LEN);
                put_u16::<NetworkEndian>(out, in_port);
                out.push(table_id);
                put_zeros(out, 3);
            }
        }
        Ofpact::Learn {
            idle_timeout,
            hard_timeout,
            priority,
            flags,
            cookie,
            table_id,
            specs,
        } => learn::to_wire(
            idle_timeout,
            hard_timeout,
            priority,
            flags,
            cookie,
            table_id,
            specs,
            out,
        ),
        Ofpact::Multipath {
            hash_fields,
            basis,
            algorithm,
            max_link,
            arg,
            ref dst,
        } => multipath::to_wire(hash_fields, basis, algorithm, max_link, arg, dst, out),
        Ofpact::Autopath { ref dst, port } => autopath::to_wire(dst, port, out),
        Ofpact::Note(data) => {
            let start = out.len();
            put_nx_header(out, NXAST_NOTE, NX_ACTION_NOTE_LEN);
            out.extend_from_slice(data);
            let len = out.len() - start;
            put_zeros(out, round_up(len, OFP_ACTION_ALIGN) - len);
            // patch the length now that the padded payload is in place
            let total = out.len() - start;
            NetworkEndian::write_u16(&mut out[start + 2..start + 4], total as u16);
        }
        Ofpact::Exit => {
            put_nx_header(out, NXAST_EXIT, NX_ACTION_HEADER_LEN);
            put_zeros(out, 6);
        }
        Ofpact::Output { .. }
        | Ofpact::Enqueue { .. }
        | Ofpact::SetVlanVid(..)
        | Ofpact::SetVlanPcp(..)
        | Ofpact::StripVlan
        | Ofpact::SetEthSrc(..)
        | Ofpact::SetEthDst(..)
        | Ofpact::SetIpv4Src(..)
        | Ofpact::SetIpv4Dst(..)
        | Ofpact::SetIpv4Dscp(..)
        | Ofpact::SetL4SrcPort(..)
        | Ofpact::SetL4DstPort(..) => {
            unreachable!("action has a native encoding in every dialect")
        }
    }
}

/// Appends `acts` to `out` as one OpenFlow 1.1 instruction of the given
/// kind. Only `ApplyActions` is supported.
pub fn to_openflow11(acts: &Ofpacts, out: &mut Vec<u8>, inst: InstructionType) {
    match inst {
        InstructionType::ApplyActions => {
            let start = out.len();
            put_zeros(out, OFP11_INSTRUCTION_ACTIONS_LEN);
            for rec in acts.iter() {
                action_to_openflow11(&rec, out);
            }
            NetworkEndian::write_u16(&mut out[start..start + 2], OFPIT11_APPLY_ACTIONS);
            let total = out.len() - start;
            NetworkEndian::write_u16(&mut out[start + 2..start + 4], total as u16);
        }
        other => panic!("no encoding for instruction {:?}", other),
    }
}

fn action_to_openflow11(rec: &Record, out: &mut Vec<u8>) {
    match rec.action {
        Ofpact::Output { port, max_len } => {
            put_action_header(out, OFPAT11_OUTPUT, OFP11_ACTION_OUTPUT_LEN);
            put_u32::<NetworkEndian>(out, ports::port_to_ofp11(port));
            put_u16::<NetworkEndian>(out, max_len);
            put_zeros(out, 6);
        }
        Ofpact::Enqueue { .. } => {
            warn_rl!(RL, "enqueue has no OpenFlow 1.1 encoding; action dropped");
        }
        Ofpact::StripVlan => {
            warn_rl!(RL, "strip_vlan has no OpenFlow 1.1 encoding; action dropped");
        }
        Ofpact::SetVlanVid(vid) => {
            put_action_header(out, OFPAT11_SET_VLAN_VID, OFP_ACTION_VLAN_VID_LEN);
            put_u16::<NetworkEndian>(out, vid);
            put_zeros(out, 2);
        }
        Ofpact::SetVlanPcp(pcp) => {
            put_action_header(out, OFPAT11_SET_VLAN_PCP, OFP_ACTION_VLAN_PCP_LEN);
            out.push(pcp);
            put_zeros(out, 3);
        }
        Ofpact::SetEthSrc(mac) => {
            put_action_header(out, OFPAT11_SET_DL_SRC, OFP_ACTION_DL_ADDR_LEN);
            out.extend_from_slice(&mac);
            put_zeros(out, 6);
        }
        Ofpact::SetEthDst(mac) => {
            put_action_header(out, OFPAT11_SET_DL_DST, OFP_ACTION_DL_ADDR_LEN);
            out.extend_from_slice(&mac);
            put_zeros(out, 6);
        }
        Ofpact::SetIpv4Src(ip) => {
            put_action_header(out, OFPAT11_SET_NW_SRC, OFP_ACTION_NW_ADDR_LEN);
            put_u32::<NetworkEndian>(out, ip);
        }
        Ofpact::SetIpv4Dst(ip) => {
            put_action_header(out, OFPAT11_SET_NW_DST, OFP_ACTION_NW_ADDR_LEN);
            put_u32::<NetworkEndian>(out, ip);
        }
        Ofpact::SetIpv4Dscp(dscp) => {
            put_action_header(out, OFPAT11_SET_NW_TOS, OFP_ACTION_NW_TOS_LEN);
            out.push(dscp);
            put_zeros(out, 3);
        }
        Ofpact::SetL4SrcPort(port) => {
            put_action_header(out, OFPAT11_SET_TP_SRC, OFP_ACTION_TP_PORT_LEN);
            put_u16::<NetworkEndian>(out, port);
            put_zeros(out, 2);
        }
        Ofpact::SetL4DstPort(port) => {
            put_action_header(out, OFPAT11_SET_TP_DST, OFP_ACTION_TP_PORT_LEN);
            put_u16::<NetworkEndian>(out, port);
            put_zeros(out, 2);
        }
        Ofpact::Controller { .. }
        | Ofpact::OutputReg { .. }
        | Ofpact::Bundle { .. }
        | Ofpact::SetTunnel(..)
        | Ofpact::SetQueue(..)
        | Ofpact::PopQueue
        | Ofpact::RegMove { .. }
        | Ofpact::RegLoad { .. }
        | Ofpact::DecTtl
        | Ofpact::FinTimeout { .. }
        | Ofpact::Resubmit { .. }
        | Ofpact::Learn { .. }
        | Ofpact::Multipath { .. }
        | Ofpact::Autopath { .. }
        | Ofpact::Note(..)
        | Ofpact::Exit => action_to_nxast(rec, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::deserialize::{pull_openflow10, pull_openflow11_instructions};

    fn decode10(wire: &[u8]) -> Ofpacts {
        let mut out = Ofpacts::new();
        pull_openflow10(wire, wire.len(), &mut out).unwrap();
        out
    }

    #[test]
    fn output_round_trips_to_identical_bytes() {
        let wire = [0x00, 0x00, 0x00, 0x08, 0x00, 0x01, 0x00, 0x00];
        let acts = decode10(&wire);
        let mut encoded = vec![];
        to_openflow10(&acts, &mut encoded);
        assert_eq!(&wire[..], &encoded[..]);
    }

    #[test]
    fn every_wire_action_is_aligned() {
        let mut acts = Ofpacts::new();
        acts.push(Compat::None, &Ofpact::Output { port: 1, max_len: 0 });
        acts.push(Compat::None, &Ofpact::Note(&[1, 2, 3]));
        acts.push(Compat::None, &Ofpact::SetVlanVid(7));
        acts.push(Compat::None, &Ofpact::DecTtl);
        acts.terminate();

        let mut out = vec![];
        to_openflow10(&acts, &mut out);
        let mut ofs = 0;
        while ofs < out.len() {
            assert_eq!(0, ofs % OFP_ACTION_ALIGN);
            let len = NetworkEndian::read_u16(&out[ofs + 2..]) as usize;
            assert!(len > 0 && len % OFP_ACTION_ALIGN == 0);
            ofs += len;
        }
        assert_eq!(out.len(), ofs);
    }

    #[test]
    fn note_payload_is_padded_and_len_patched() {
        let mut acts = Ofpacts::new();
        acts.push(Compat::None, &Ofpact::Note(&[0xaa; 7]));
        acts.terminate();
        let mut out = vec![];
        to_openflow10(&acts, &mut out);
        // 10 header bytes + 7 note bytes, padded up to 24
        assert_eq!(24, out.len());
        assert_eq!(24, NetworkEndian::read_u16(&out[2..]));
        assert_eq!(NXAST_NOTE, NetworkEndian::read_u16(&out[8..]));
    }

    #[test]
    fn tunnel_id_width_follows_value_and_compat() {
        let expect_subtype = |compat, tun_id, subtype| {
            let mut acts = Ofpacts::new();
            acts.push(compat, &Ofpact::SetTunnel(tun_id));
            acts.terminate();
            let mut out = vec![];
            to_openflow10(&acts, &mut out);
            assert_eq!(subtype, NetworkEndian::read_u16(&out[8..]));
        };
        expect_subtype(Compat::SetTunnel, 0x42, NXAST_SET_TUNNEL);
        expect_subtype(Compat::None, 0x42, NXAST_SET_TUNNEL);
        expect_subtype(Compat::SetTunnel64, 0x42, NXAST_SET_TUNNEL64);
        expect_subtype(Compat::SetTunnel, 0x1_0000_0000, NXAST_SET_TUNNEL64);
    }

    #[test]
    fn resubmit_shape_follows_table_and_compat() {
        let expect_subtype = |compat, table_id, subtype| {
            let mut acts = Ofpacts::new();
            acts.push(compat, &Ofpact::Resubmit { in_port: 1, table_id });
            acts.terminate();
            let mut out = vec![];
            to_openflow10(&acts, &mut out);
            assert_eq!(subtype, NetworkEndian::read_u16(&out[8..]));
        };
        expect_subtype(Compat::Resubmit, 0xff, NXAST_RESUBMIT);
        expect_subtype(Compat::None, 0xff, NXAST_RESUBMIT);
        expect_subtype(Compat::ResubmitTable, 0xff, NXAST_RESUBMIT_TABLE);
        expect_subtype(Compat::None, 3, NXAST_RESUBMIT_TABLE);
    }

    #[test]
    fn apply_actions_wrap() {
        let mut acts = Ofpacts::new();
        acts.push(Compat::None, &Ofpact::Output { port: 2, max_len: 0 });
        acts.terminate();
        let mut out = vec![];
        to_openflow11(&acts, &mut out, InstructionType::ApplyActions);

        assert_eq!(OFPIT11_APPLY_ACTIONS, NetworkEndian::read_u16(&out[0..]));
        assert_eq!(out.len(), NetworkEndian::read_u16(&out[2..]) as usize);
        assert_eq!(8 + OFP11_ACTION_OUTPUT_LEN, out.len());

        // and it decodes back to the same stream
        let mut redecoded = Ofpacts::new();
        pull_openflow11_instructions(&out, out.len(), &mut redecoded).unwrap();
        assert!(acts.equal(&redecoded));
    }

    #[test]
    fn openflow11_gaps_emit_nothing() {
        let mut acts = Ofpacts::new();
        acts.push(Compat::None, &Ofpact::Enqueue { port: 1, queue: 2 });
        acts.push(Compat::None, &Ofpact::StripVlan);
        acts.terminate();
        let mut out = vec![];
        to_openflow11(&acts, &mut out, InstructionType::ApplyActions);
        assert_eq!(OFP11_INSTRUCTION_ACTIONS_LEN, out.len());
    }

    #[test]
    fn vendor_actions_round_trip_through_openflow10() {
        let mut acts = Ofpacts::new();
        acts.push(Compat::None, &Ofpact::Controller {
            max_len: 123,
            controller_id: 0,
            reason: 1,
        });
        acts.push(Compat::None, &Ofpact::FinTimeout {
            idle_timeout: 10,
            hard_timeout: 0,
        });
        acts.push(Compat::None, &Ofpact::SetQueue(8));
        acts.push(Compat::None, &Ofpact::PopQueue);
        acts.push(Compat::None, &Ofpact::Exit);
        acts.push(Compat::None, &Ofpact::DecTtl);
        acts.terminate();

        let mut wire = vec![];
        to_openflow10(&acts, &mut wire);
        let redecoded = decode10(&wire);
        assert!(acts.equal(&redecoded));
    }
}
