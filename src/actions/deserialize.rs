/*!
Decoding wire actions and instructions into internal records.

Three dialects arrive here: OpenFlow 1.0 actions, OpenFlow 1.1 actions
(alone or wrapped in an `apply_actions` instruction), and the Nicira
vendor extension reachable from both. All of them funnel through one
TLV walker that refuses misaligned, undersized or overrunning length
fields before any per-type parser sees the bytes.

Every entry point owns the whole output buffer: it is cleared on entry
and cleared again on any failure, so partial results are never
observable.
*/

use byteorder::{ByteOrder, NetworkEndian};

use crate::diag::RateLimit;
use crate::error::{Error, Result};
use crate::meta_flow::{self, SubField};
use crate::ports::{self, OFPP_IN_PORT, OFPP_LOCAL, OFPP_MAX};

use super::wire::*;
use super::{autopath, bundle, learn, multipath, reg};
use super::{Compat, Ofpact, Ofpacts};

static RL: RateLimit = RateLimit::new(1, 5);

/// The DSCP bits of the IPv4 TOS byte; the low two bits are ECN.
const IP_DSCP_MASK: u8 = 0xfc;

/// Parses `actions_len` bytes of OpenFlow 1.0 actions from the front of
/// `actions` into `out`. `actions_len` must be a multiple of 8 no
/// larger than the span.
///
/// On success `out` holds the decoded records followed by the
/// terminator; on failure it is empty and the error is returned. No
/// validation against a flow context happens here; see `check`.
pub fn pull_openflow10(actions: &[u8], actions_len: usize, out: &mut Ofpacts) -> Result<()> {
    out.clear();
    pull_actions(actions, actions_len, out, ofpact_from_openflow10).map_err(|e| {
        out.clear();
        e
    })
}

fn pull_actions(
    span: &[u8],
    actions_len: usize,
    out: &mut Ofpacts,
    ofpact_from_openflow: fn(&[u8], &mut Ofpacts) -> Result<()>,
) -> Result<()> {
    if actions_len % OFP_ACTION_ALIGN != 0 {
        warn_rl!(
            RL,
            "actions length {} is not a multiple of {}",
            actions_len,
            OFP_ACTION_ALIGN
        );
        return Err(Error::BadLen);
    }
    if actions_len > span.len() {
        warn_rl!(
            RL,
            "actions length {} exceeds remaining message length ({})",
            actions_len,
            span.len()
        );
        return Err(Error::BadLen);
    }
    walk_actions(&span[..actions_len], out, ofpact_from_openflow)?;
    out.terminate();
    Ok(())
}

/// Walks a span of wire actions, handing each complete record to the
/// per-dialect parser. The span length is already a multiple of the
/// action alignment.
fn walk_actions(
    actions: &[u8],
    out: &mut Ofpacts,
    ofpact_from_openflow: fn(&[u8], &mut Ofpacts) -> Result<()>,
) -> Result<()> {
    let mut rest = actions;
    while !rest.is_empty() {
        let ofs = actions.len() - rest.len();
        let len = NetworkEndian::read_u16(&rest[2..]) as usize;
        if len % OFP_ACTION_ALIGN != 0 || len < OFP_ACTION_HEADER_LEN || len > rest.len() {
            warn_rl!(RL, "bad action format at offset {}", ofs);
            return Err(Error::BadLen);
        }
        let (a, tail) = rest.split_at(len);
        if let Err(e) = ofpact_from_openflow(a, out) {
            warn_rl!(RL, "bad action at offset {} ({})", ofs, e);
            return Err(e);
        }
        rest = tail;
    }
    Ok(())
}

/// `len == expected`, the rule for fixed-size wire structs.
fn fixed_len(a: &[u8], expected: usize) -> Result<()> {
    if a.len() == expected {
        Ok(())
    } else {
        Err(Error::BadLen)
    }
}

/// `len >= expected`, the rule for extensible wire structs.
fn extensible_len(a: &[u8], expected: usize) -> Result<()> {
    if a.len() >= expected {
        Ok(())
    } else {
        Err(Error::BadLen)
    }
}

fn ofpact_from_openflow10(a: &[u8], out: &mut Ofpacts) -> Result<()> {
    match NetworkEndian::read_u16(a) {
        OFPAT10_OUTPUT => {
            fixed_len(a, OFP10_ACTION_OUTPUT_LEN)?;
            let port = NetworkEndian::read_u16(&a[4..]);
            let max_len = NetworkEndian::read_u16(&a[6..]);
            ports::check_output_port(port, OFPP_MAX)?;
            out.push(Compat::None, &Ofpact::Output { port, max_len });
            Ok(())
        }
        OFPAT10_SET_VLAN_VID => {
            fixed_len(a, OFP_ACTION_VLAN_VID_LEN)?;
            let vid = NetworkEndian::read_u16(&a[4..]);
            if vid & !0xfff != 0 {
                return Err(Error::BadArgument);
            }
            out.push(Compat::None, &Ofpact::SetVlanVid(vid));
            Ok(())
        }
        OFPAT10_SET_VLAN_PCP => {
            fixed_len(a, OFP_ACTION_VLAN_PCP_LEN)?;
            let pcp = a[4];
            if pcp & !7 != 0 {
                return Err(Error::BadArgument);
            }
            out.push(Compat::None, &Ofpact::SetVlanPcp(pcp));
            Ok(())
        }
        OFPAT10_STRIP_VLAN => {
            fixed_len(a, OFP_ACTION_HEADER_LEN)?;
            out.push(Compat::None, &Ofpact::StripVlan);
            Ok(())
        }
        OFPAT10_SET_DL_SRC => {
            fixed_len(a, OFP_ACTION_DL_ADDR_LEN)?;
            out.push(Compat::None, &Ofpact::SetEthSrc(read_mac(a)));
            Ok(())
        }
        OFPAT10_SET_DL_DST => {
            fixed_len(a, OFP_ACTION_DL_ADDR_LEN)?;
            out.push(Compat::None, &Ofpact::SetEthDst(read_mac(a)));
            Ok(())
        }
        OFPAT10_SET_NW_SRC => {
            fixed_len(a, OFP_ACTION_NW_ADDR_LEN)?;
            let ip = NetworkEndian::read_u32(&a[4..]);
            out.push(Compat::None, &Ofpact::SetIpv4Src(ip));
            Ok(())
        }
        OFPAT10_SET_NW_DST => {
            fixed_len(a, OFP_ACTION_NW_ADDR_LEN)?;
            let ip = NetworkEndian::read_u32(&a[4..]);
            out.push(Compat::None, &Ofpact::SetIpv4Dst(ip));
            Ok(())
        }
        OFPAT10_SET_NW_TOS => {
            fixed_len(a, OFP_ACTION_NW_TOS_LEN)?;
            let tos = a[4];
            if tos & !IP_DSCP_MASK != 0 {
                return Err(Error::BadArgument);
            }
            out.push(Compat::None, &Ofpact::SetIpv4Dscp(tos));
            Ok(())
        }
        OFPAT10_SET_TP_SRC => {
            fixed_len(a, OFP_ACTION_TP_PORT_LEN)?;
            let port = NetworkEndian::read_u16(&a[4..]);
            out.push(Compat::None, &Ofpact::SetL4SrcPort(port));
            Ok(())
        }
        OFPAT10_SET_TP_DST => {
            fixed_len(a, OFP_ACTION_TP_PORT_LEN)?;
            let port = NetworkEndian::read_u16(&a[4..]);
            out.push(Compat::None, &Ofpact::SetL4DstPort(port));
            Ok(())
        }
        OFPAT10_ENQUEUE => {
            fixed_len(a, OFP_ACTION_ENQUEUE_LEN)?;
            let port = NetworkEndian::read_u16(&a[4..]);
            let queue = NetworkEndian::read_u32(&a[12..]);
            if port >= OFPP_MAX && port != OFPP_IN_PORT && port != OFPP_LOCAL {
                return Err(Error::BadOutPort);
            }
            out.push(Compat::None, &Ofpact::Enqueue { port, queue });
            Ok(())
        }
        OFPAT10_VENDOR => ofpact_from_nxast(a, out),
        _ => Err(Error::BadType),
    }
}

fn read_mac(a: &[u8]) -> [u8; 6] {
    let mut mac = [0; 6];
    mac.copy_from_slice(&a[4..10]);
    mac
}

/// Decodes a vendor action. The walker has already bounded `a` to its
/// length field.
fn ofpact_from_nxast(a: &[u8], out: &mut Ofpacts) -> Result<()> {
    if a.len() < NX_ACTION_HEADER_LEN {
        return Err(Error::BadLen);
    }
    if NetworkEndian::read_u32(&a[4..]) != NX_VENDOR_ID {
        return Err(Error::BadVendor);
    }
    let subtype = NetworkEndian::read_u16(&a[8..]);
    match subtype {
        NXAST_RESUBMIT => {
            fixed_len(a, NX_ACTION_RESUBMIT_LEN)?;
            let in_port = NetworkEndian::read_u16(&a[10..]);
            out.push(
                Compat::Resubmit,
                &Ofpact::Resubmit {
                    in_port,
                    table_id: 0xff,
                },
            );
            Ok(())
        }
        NXAST_RESUBMIT_TABLE => {
            fixed_len(a, NX_ACTION_RESUBMIT_LEN)?;
            if !is_all_zeros(&a[13..16]) {
                return Err(Error::BadArgument);
            }
            let in_port = NetworkEndian::read_u16(&a[10..]);
            out.push(
                Compat::ResubmitTable,
                &Ofpact::Resubmit {
                    in_port,
                    table_id: a[12],
                },
            );
            Ok(())
        }
        NXAST_SET_TUNNEL => {
            fixed_len(a, NX_ACTION_SET_TUNNEL_LEN)?;
            let tun_id = u64::from(NetworkEndian::read_u32(&a[12..]));
            out.push(Compat::SetTunnel, &Ofpact::SetTunnel(tun_id));
            Ok(())
        }
        NXAST_SET_TUNNEL64 => {
            fixed_len(a, NX_ACTION_SET_TUNNEL64_LEN)?;
            let tun_id = NetworkEndian::read_u64(&a[16..]);
            out.push(Compat::SetTunnel64, &Ofpact::SetTunnel(tun_id));
            Ok(())
        }
        NXAST_SET_QUEUE => {
            fixed_len(a, NX_ACTION_SET_QUEUE_LEN)?;
            let queue_id = NetworkEndian::read_u32(&a[12..]);
            out.push(Compat::None, &Ofpact::SetQueue(queue_id));
            Ok(())
        }
        NXAST_POP_QUEUE => {
            fixed_len(a, NX_ACTION_POP_QUEUE_LEN)?;
            out.push(Compat::None, &Ofpact::PopQueue);
            Ok(())
        }
        NXAST_REG_MOVE => {
            fixed_len(a, NX_ACTION_REG_MOVE_LEN)?;
            reg::move_from_wire(a, out)
        }
        NXAST_REG_LOAD => {
            fixed_len(a, NX_ACTION_REG_LOAD_LEN)?;
            reg::load_from_wire(a, out)
        }
        NXAST_NOTE => {
            extensible_len(a, NX_ACTION_NOTE_LEN)?;
            // all trailing bytes are the note, wire padding included
            out.push(Compat::None, &Ofpact::Note(&a[NX_ACTION_PAYLOAD_OFS..]));
            Ok(())
        }
        NXAST_MULTIPATH => {
            fixed_len(a, NX_ACTION_MULTIPATH_LEN)?;
            multipath::from_wire(a, out)
        }
        NXAST_AUTOPATH => {
            fixed_len(a, NX_ACTION_AUTOPATH_LEN)?;
            autopath::from_wire(a, out)
        }
        NXAST_BUNDLE | NXAST_BUNDLE_LOAD => {
            extensible_len(a, NX_ACTION_BUNDLE_LEN)?;
            bundle::from_wire(a, subtype, out)
        }
        NXAST_OUTPUT_REG => {
            fixed_len(a, NX_ACTION_OUTPUT_REG_LEN)?;
            if !is_all_zeros(&a[18..24]) {
                return Err(Error::BadArgument);
            }
            let (ofs, n_bits) = meta_flow::decode_ofs_nbits(NetworkEndian::read_u16(&a[10..]));
            let src = SubField::from_nxm(NetworkEndian::read_u32(&a[12..]), ofs, n_bits)?;
            meta_flow::check_src(&src, None)?;
            let max_len = NetworkEndian::read_u16(&a[16..]);
            out.push(Compat::None, &Ofpact::OutputReg { src, max_len });
            Ok(())
        }
        NXAST_LEARN => {
            extensible_len(a, NX_ACTION_LEARN_LEN)?;
            learn::from_wire(a, out)
        }
        NXAST_EXIT => {
            fixed_len(a, NX_ACTION_HEADER_LEN)?;
            out.push(Compat::None, &Ofpact::Exit);
            Ok(())
        }
        NXAST_DEC_TTL => {
            fixed_len(a, NX_ACTION_HEADER_LEN)?;
            out.push(Compat::None, &Ofpact::DecTtl);
            Ok(())
        }
        NXAST_FIN_TIMEOUT => {
            fixed_len(a, NX_ACTION_FIN_TIMEOUT_LEN)?;
            out.push(
                Compat::None,
                &Ofpact::FinTimeout {
                    idle_timeout: NetworkEndian::read_u16(&a[10..]),
                    hard_timeout: NetworkEndian::read_u16(&a[12..]),
                },
            );
            Ok(())
        }
        NXAST_CONTROLLER => {
            fixed_len(a, NX_ACTION_CONTROLLER_LEN)?;
            out.push(
                Compat::None,
                &Ofpact::Controller {
                    max_len: NetworkEndian::read_u16(&a[10..]),
                    controller_id: NetworkEndian::read_u16(&a[12..]),
                    reason: a[14],
                },
            );
            Ok(())
        }
        // dropped long ago; must never be silently accepted
        NXAST_SNAT_OBSOLETE | NXAST_DROP_SPOOFED_ARP_OBSOLETE => Err(Error::BadType),
        _ => Err(Error::BadType),
    }
}

fn ofpact_from_openflow11(a: &[u8], out: &mut Ofpacts) -> Result<()> {
    match NetworkEndian::read_u16(a) {
        OFPAT11_OUTPUT => {
            fixed_len(a, OFP11_ACTION_OUTPUT_LEN)?;
            let port = ports::port_from_ofp11(NetworkEndian::read_u32(&a[4..]))?;
            let max_len = NetworkEndian::read_u16(&a[8..]);
            ports::check_output_port(port, OFPP_MAX)?;
            out.push(Compat::None, &Ofpact::Output { port, max_len });
            Ok(())
        }
        OFPAT11_SET_VLAN_VID => {
            fixed_len(a, OFP_ACTION_VLAN_VID_LEN)?;
            let vid = NetworkEndian::read_u16(&a[4..]);
            if vid & !0xfff != 0 {
                return Err(Error::BadArgument);
            }
            out.push(Compat::None, &Ofpact::SetVlanVid(vid));
            Ok(())
        }
        OFPAT11_SET_VLAN_PCP => {
            fixed_len(a, OFP_ACTION_VLAN_PCP_LEN)?;
            let pcp = a[4];
            if pcp & !7 != 0 {
                return Err(Error::BadArgument);
            }
            out.push(Compat::None, &Ofpact::SetVlanPcp(pcp));
            Ok(())
        }
        OFPAT11_SET_DL_SRC => {
            fixed_len(a, OFP_ACTION_DL_ADDR_LEN)?;
            out.push(Compat::None, &Ofpact::SetEthSrc(read_mac(a)));
            Ok(())
        }
        OFPAT11_SET_DL_DST => {
            fixed_len(a, OFP_ACTION_DL_ADDR_LEN)?;
            out.push(Compat::None, &Ofpact::SetEthDst(read_mac(a)));
            Ok(())
        }
        OFPAT11_SET_NW_SRC => {
            fixed_len(a, OFP_ACTION_NW_ADDR_LEN)?;
            let ip = NetworkEndian::read_u32(&a[4..]);
            out.push(Compat::None, &Ofpact::SetIpv4Src(ip));
            Ok(())
        }
        OFPAT11_SET_NW_DST => {
            fixed_len(a, OFP_ACTION_NW_ADDR_LEN)?;
            let ip = NetworkEndian::read_u32(&a[4..]);
            out.push(Compat::None, &Ofpact::SetIpv4Dst(ip));
            Ok(())
        }
        OFPAT11_SET_NW_TOS => {
            fixed_len(a, OFP_ACTION_NW_TOS_LEN)?;
            let tos = a[4];
            if tos & !IP_DSCP_MASK != 0 {
                return Err(Error::BadArgument);
            }
            out.push(Compat::None, &Ofpact::SetIpv4Dscp(tos));
            Ok(())
        }
        OFPAT11_SET_TP_SRC => {
            fixed_len(a, OFP_ACTION_TP_PORT_LEN)?;
            let port = NetworkEndian::read_u16(&a[4..]);
            out.push(Compat::None, &Ofpact::SetL4SrcPort(port));
            Ok(())
        }
        OFPAT11_SET_TP_DST => {
            fixed_len(a, OFP_ACTION_TP_PORT_LEN)?;
            let port = NetworkEndian::read_u16(&a[4..]);
            out.push(Compat::None, &Ofpact::SetL4DstPort(port));
            Ok(())
        }
        OFPAT11_EXPERIMENTER => ofpact_from_nxast(a, out),
        _ => Err(Error::BadType),
    }
}

/* OpenFlow 1.1 instructions. */

const INST_GOTO_TABLE: usize = 0;
const INST_WRITE_METADATA: usize = 1;
const INST_WRITE_ACTIONS: usize = 2;
const INST_APPLY_ACTIONS: usize = 3;
const INST_CLEAR_ACTIONS: usize = 4;
const N_INSTRUCTIONS: usize = 5;

/// Classifies one instruction and verifies its length against its
/// type, returning its slot in the first-occurrence table.
fn classify_instruction(inst: &[u8]) -> Result<usize> {
    let (slot, struct_len, extensible) = match NetworkEndian::read_u16(inst) {
        OFPIT11_EXPERIMENTER => return Err(Error::BadExperimenter),
        OFPIT11_GOTO_TABLE => (INST_GOTO_TABLE, OFP11_INSTRUCTION_GOTO_TABLE_LEN, false),
        OFPIT11_WRITE_METADATA => (
            INST_WRITE_METADATA,
            OFP11_INSTRUCTION_WRITE_METADATA_LEN,
            false,
        ),
        OFPIT11_WRITE_ACTIONS => (INST_WRITE_ACTIONS, OFP11_INSTRUCTION_ACTIONS_LEN, true),
        OFPIT11_APPLY_ACTIONS => (INST_APPLY_ACTIONS, OFP11_INSTRUCTION_ACTIONS_LEN, true),
        OFPIT11_CLEAR_ACTIONS => (INST_CLEAR_ACTIONS, OFP11_INSTRUCTION_LEN, false),
        _ => return Err(Error::UnknownInst),
    };
    let len_ok = if extensible {
        inst.len() >= struct_len
    } else {
        inst.len() == struct_len
    };
    if len_ok {
        Ok(slot)
    } else {
        Err(Error::BadLen)
    }
}

/// Parses `instructions_len` bytes holding one OpenFlow 1.1 instruction
/// block. Only `apply_actions` is supported: its actions are decoded
/// into `out`, any other instruction kind fails the whole block.
pub fn pull_openflow11_instructions(
    instructions: &[u8],
    instructions_len: usize,
    out: &mut Ofpacts,
) -> Result<()> {
    out.clear();
    pull_instructions(instructions, instructions_len, out).map_err(|e| {
        out.clear();
        e
    })
}

fn pull_instructions(span: &[u8], instructions_len: usize, out: &mut Ofpacts) -> Result<()> {
    if instructions_len % OFP11_INSTRUCTION_ALIGN != 0 {
        warn_rl!(
            RL,
            "instructions length {} is not a multiple of {}",
            instructions_len,
            OFP11_INSTRUCTION_ALIGN
        );
        return Err(Error::BadLen);
    }
    if instructions_len > span.len() {
        warn_rl!(
            RL,
            "instructions length {} exceeds remaining message length ({})",
            instructions_len,
            span.len()
        );
        return Err(Error::BadLen);
    }

    let mut insts: [Option<&[u8]>; N_INSTRUCTIONS] = [None; N_INSTRUCTIONS];
    let mut rest = &span[..instructions_len];
    while !rest.is_empty() {
        let ofs = instructions_len - rest.len();
        let len = NetworkEndian::read_u16(&rest[2..]) as usize;
        if len % OFP11_INSTRUCTION_ALIGN != 0 || len < OFP11_INSTRUCTION_LEN || len > rest.len() {
            warn_rl!(RL, "bad instruction format at offset {}", ofs);
            return Err(Error::BadLen);
        }
        let (inst, tail) = rest.split_at(len);
        let slot = classify_instruction(inst)?;
        if insts[slot].is_some() {
            return Err(Error::DupType);
        }
        insts[slot] = Some(inst);
        rest = tail;
    }

    if let Some(apply) = insts[INST_APPLY_ACTIONS] {
        walk_actions(
            &apply[OFP11_INSTRUCTION_ACTIONS_LEN..],
            out,
            ofpact_from_openflow11,
        )?;
    }
    out.terminate();

    if insts[INST_GOTO_TABLE].is_some()
        || insts[INST_WRITE_METADATA].is_some()
        || insts[INST_WRITE_ACTIONS].is_some()
        || insts[INST_CLEAR_ACTIONS].is_some()
    {
        return Err(Error::UnsupInst);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode10(wire: &[u8]) -> Result<Ofpacts> {
        let mut out = Ofpacts::new();
        pull_openflow10(wire, wire.len(), &mut out).map(|()| out)
    }

    fn decode11_insts(wire: &[u8]) -> Result<Ofpacts> {
        let mut out = Ofpacts::new();
        pull_openflow11_instructions(wire, wire.len(), &mut out).map(|()| out)
    }

    fn output10(port: u16, max_len: u16) -> Vec<u8> {
        let mut a = vec![];
        put_u16::<NetworkEndian>(&mut a, OFPAT10_OUTPUT);
        put_u16::<NetworkEndian>(&mut a, 8);
        put_u16::<NetworkEndian>(&mut a, port);
        put_u16::<NetworkEndian>(&mut a, max_len);
        a
    }

    #[test]
    fn simple_output() {
        let acts = decode10(&output10(1, 0)).unwrap();
        let recs: Vec<_> = acts.iter().collect();
        assert_eq!(1, recs.len());
        assert_eq!(Ofpact::Output { port: 1, max_len: 0 }, recs[0].action);
    }

    #[test]
    fn empty_span_decodes_to_drop() {
        let acts = decode10(&[]).unwrap();
        assert!(acts.is_empty());
    }

    #[test]
    fn bad_port_leaves_output_empty() {
        let mut out = Ofpacts::new();
        let err = pull_openflow10(&output10(0xff00, 0), 8, &mut out).unwrap_err();
        assert_eq!(Error::BadOutPort, err);
        assert!(out.as_bytes().is_empty());
    }

    #[test]
    fn earlier_actions_do_not_leak() {
        let mut wire = output10(1, 0);
        wire.extend_from_slice(&output10(0xff00, 0));
        let mut out = Ofpacts::new();
        assert_eq!(Err(Error::BadOutPort), pull_openflow10(&wire, 16, &mut out));
        assert!(out.as_bytes().is_empty());
    }

    #[test]
    fn misaligned_actions_len() {
        let wire = output10(1, 0);
        let mut out = Ofpacts::new();
        assert_eq!(Err(Error::BadLen), pull_openflow10(&wire, 4, &mut out));
    }

    #[test]
    fn actions_len_beyond_span() {
        let wire = output10(1, 0);
        let mut out = Ofpacts::new();
        assert_eq!(Err(Error::BadLen), pull_openflow10(&wire, 16, &mut out));
    }

    #[test]
    fn corrupt_record_len_is_rejected() {
        for bad_len in [0u16, 4, 12, 0xfff8].iter() {
            let mut wire = output10(1, 0);
            NetworkEndian::write_u16(&mut wire[2..4], *bad_len);
            assert_eq!(Err(Error::BadLen), decode10(&wire).map(|_| ()));
        }
    }

    #[test]
    fn unknown_type() {
        let mut wire = output10(1, 0);
        NetworkEndian::write_u16(&mut wire[0..2], 0x1234);
        assert_eq!(Err(Error::BadType), decode10(&wire).map(|_| ()));
    }

    #[test]
    fn strip_vlan() {
        let wire = [0x00, 0x03, 0x00, 0x08, 0, 0, 0, 0];
        let acts = decode10(&wire).unwrap();
        let recs: Vec<_> = acts.iter().collect();
        assert_eq!(1, recs.len());
        assert_eq!(Ofpact::StripVlan, recs[0].action);
    }

    #[test]
    fn vlan_vid_reserved_bits() {
        let mut wire = vec![];
        put_u16::<NetworkEndian>(&mut wire, OFPAT10_SET_VLAN_VID);
        put_u16::<NetworkEndian>(&mut wire, 8);
        put_u16::<NetworkEndian>(&mut wire, 0x1fff);
        put_u16::<NetworkEndian>(&mut wire, 0);
        assert_eq!(Err(Error::BadArgument), decode10(&wire).map(|_| ()));
    }

    #[test]
    fn nw_tos_ecn_bits() {
        let mut wire = vec![];
        put_u16::<NetworkEndian>(&mut wire, OFPAT10_SET_NW_TOS);
        put_u16::<NetworkEndian>(&mut wire, 8);
        wire.extend_from_slice(&[0x03, 0, 0, 0]);
        assert_eq!(Err(Error::BadArgument), decode10(&wire).map(|_| ()));
    }

    #[test]
    fn enqueue_port_rule() {
        let enqueue = |port: u16| {
            let mut wire = vec![];
            put_u16::<NetworkEndian>(&mut wire, OFPAT10_ENQUEUE);
            put_u16::<NetworkEndian>(&mut wire, 16);
            put_u16::<NetworkEndian>(&mut wire, port);
            wire.extend_from_slice(&[0; 6]);
            put_u32::<NetworkEndian>(&mut wire, 1);
            wire
        };
        assert!(decode10(&enqueue(3)).is_ok());
        assert!(decode10(&enqueue(OFPP_IN_PORT)).is_ok());
        assert!(decode10(&enqueue(OFPP_LOCAL)).is_ok());
        assert_eq!(
            Err(Error::BadOutPort),
            decode10(&enqueue(crate::ports::OFPP_FLOOD)).map(|_| ())
        );
    }

    fn nx_fixed(subtype: u16, len: usize) -> Vec<u8> {
        let mut wire = vec![];
        put_nx_header(&mut wire, subtype, len);
        wire.resize(len, 0);
        wire
    }

    #[test]
    fn vendor_id_is_checked() {
        let mut wire = nx_fixed(NXAST_DEC_TTL, 16);
        NetworkEndian::write_u32(&mut wire[4..8], 0x0000_1234);
        assert_eq!(Err(Error::BadVendor), decode10(&wire).map(|_| ()));
    }

    #[test]
    fn short_vendor_action() {
        let mut wire = vec![];
        put_u16::<NetworkEndian>(&mut wire, OFPAT10_VENDOR);
        put_u16::<NetworkEndian>(&mut wire, 8);
        put_u32::<NetworkEndian>(&mut wire, NX_VENDOR_ID);
        assert_eq!(Err(Error::BadLen), decode10(&wire).map(|_| ()));
    }

    #[test]
    fn obsolete_subtypes_are_rejected() {
        for subtype in [NXAST_SNAT_OBSOLETE, NXAST_DROP_SPOOFED_ARP_OBSOLETE].iter() {
            let wire = nx_fixed(*subtype, 16);
            assert_eq!(Err(Error::BadType), decode10(&wire).map(|_| ()));
        }
    }

    #[test]
    fn resubmit_same_table() {
        let mut wire = nx_fixed(NXAST_RESUBMIT, 16);
        NetworkEndian::write_u16(&mut wire[10..12], 2);
        let acts = decode10(&wire).unwrap();
        let rec = acts.iter().next().unwrap();
        assert_eq!(Compat::Resubmit, rec.compat);
        assert_eq!(
            Ofpact::Resubmit {
                in_port: 2,
                table_id: 0xff
            },
            rec.action
        );
    }

    #[test]
    fn resubmit_table_padding_must_be_zero() {
        let mut wire = nx_fixed(NXAST_RESUBMIT_TABLE, 16);
        wire[12] = 3; // table id
        wire[14] = 1; // padding
        assert_eq!(Err(Error::BadArgument), decode10(&wire).map(|_| ()));

        wire[14] = 0;
        let acts = decode10(&wire).unwrap();
        let rec = acts.iter().next().unwrap();
        assert_eq!(Compat::ResubmitTable, rec.compat);
        assert_eq!(
            Ofpact::Resubmit {
                in_port: 0,
                table_id: 3
            },
            rec.action
        );
    }

    #[test]
    fn tunnel_compat() {
        let mut wire32 = nx_fixed(NXAST_SET_TUNNEL, 16);
        NetworkEndian::write_u32(&mut wire32[12..16], 0x42);
        let acts = decode10(&wire32).unwrap();
        let rec = acts.iter().next().unwrap();
        assert_eq!(Compat::SetTunnel, rec.compat);
        assert_eq!(Ofpact::SetTunnel(0x42), rec.action);

        let mut wire64 = nx_fixed(NXAST_SET_TUNNEL64, 24);
        NetworkEndian::write_u64(&mut wire64[16..24], 0x1_0000_0001);
        let acts = decode10(&wire64).unwrap();
        let rec = acts.iter().next().unwrap();
        assert_eq!(Compat::SetTunnel64, rec.compat);
        assert_eq!(Ofpact::SetTunnel(0x1_0000_0001), rec.action);
    }

    #[test]
    fn note_captures_trailing_padding() {
        let mut wire = vec![];
        put_nx_header(&mut wire, NXAST_NOTE, 16);
        wire.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef, 0x00, 0x00]);
        let acts = decode10(&wire).unwrap();
        let rec = acts.iter().next().unwrap();
        assert_eq!(
            Ofpact::Note(&[0xde, 0xad, 0xbe, 0xef, 0x00, 0x00]),
            rec.action
        );
    }

    #[test]
    fn output_reg_reserved_must_be_zero() {
        let mut wire = nx_fixed(NXAST_OUTPUT_REG, 24);
        NetworkEndian::write_u16(
            &mut wire[10..12],
            crate::meta_flow::encode_ofs_nbits(0, 16),
        );
        NetworkEndian::write_u32(&mut wire[12..16], 0x0001_0004);
        wire[20] = 1;
        assert_eq!(Err(Error::BadArgument), decode10(&wire).map(|_| ()));

        wire[20] = 0;
        assert!(decode10(&wire).is_ok());
    }

    #[test]
    fn controller_action() {
        let mut wire = nx_fixed(NXAST_CONTROLLER, 16);
        NetworkEndian::write_u16(&mut wire[10..12], 0xffff);
        NetworkEndian::write_u16(&mut wire[12..14], 7);
        wire[14] = 2;
        let acts = decode10(&wire).unwrap();
        let rec = acts.iter().next().unwrap();
        assert_eq!(
            Ofpact::Controller {
                max_len: 0xffff,
                controller_id: 7,
                reason: 2
            },
            rec.action
        );
    }

    fn output11(port: u32, max_len: u16) -> Vec<u8> {
        let mut a = vec![];
        put_u16::<NetworkEndian>(&mut a, OFPAT11_OUTPUT);
        put_u16::<NetworkEndian>(&mut a, 16);
        put_u32::<NetworkEndian>(&mut a, port);
        put_u16::<NetworkEndian>(&mut a, max_len);
        a.extend_from_slice(&[0; 6]);
        a
    }

    fn apply_actions(actions: &[u8]) -> Vec<u8> {
        let mut inst = vec![];
        put_u16::<NetworkEndian>(&mut inst, OFPIT11_APPLY_ACTIONS);
        put_u16::<NetworkEndian>(&mut inst, (8 + actions.len()) as u16);
        inst.extend_from_slice(&[0; 4]);
        inst.extend_from_slice(actions);
        inst
    }

    #[test]
    fn apply_actions_with_output() {
        let wire = apply_actions(&output11(0xffff_fffe, 0));
        let acts = decode11_insts(&wire).unwrap();
        let rec = acts.iter().next().unwrap();
        assert_eq!(
            Ofpact::Output {
                port: OFPP_LOCAL,
                max_len: 0
            },
            rec.action
        );
    }

    #[test]
    fn unsupported_instruction() {
        let mut wire = vec![];
        put_u16::<NetworkEndian>(&mut wire, OFPIT11_GOTO_TABLE);
        put_u16::<NetworkEndian>(&mut wire, 8);
        wire.extend_from_slice(&[1, 0, 0, 0]);
        let mut out = Ofpacts::new();
        assert_eq!(
            Err(Error::UnsupInst),
            pull_openflow11_instructions(&wire, 8, &mut out)
        );
        assert!(out.as_bytes().is_empty());
    }

    #[test]
    fn duplicate_instruction() {
        let mut wire = apply_actions(&[]);
        let again = apply_actions(&[]);
        wire.extend_from_slice(&again);
        assert_eq!(Err(Error::DupType), decode11_insts(&wire).map(|_| ()));
    }

    #[test]
    fn experimenter_instruction() {
        let mut wire = vec![];
        put_u16::<NetworkEndian>(&mut wire, OFPIT11_EXPERIMENTER);
        put_u16::<NetworkEndian>(&mut wire, 8);
        wire.extend_from_slice(&[0; 4]);
        assert_eq!(
            Err(Error::BadExperimenter),
            decode11_insts(&wire).map(|_| ())
        );
    }

    #[test]
    fn unknown_instruction() {
        let mut wire = vec![];
        put_u16::<NetworkEndian>(&mut wire, 0x42);
        put_u16::<NetworkEndian>(&mut wire, 8);
        wire.extend_from_slice(&[0; 4]);
        assert_eq!(Err(Error::UnknownInst), decode11_insts(&wire).map(|_| ()));
    }

    #[test]
    fn write_metadata_length_is_checked() {
        let mut wire = vec![];
        put_u16::<NetworkEndian>(&mut wire, OFPIT11_WRITE_METADATA);
        put_u16::<NetworkEndian>(&mut wire, 8);
        wire.extend_from_slice(&[0; 4]);
        assert_eq!(Err(Error::BadLen), decode11_insts(&wire).map(|_| ()));
    }

    #[test]
    fn bad_port_inside_apply_actions() {
        let wire = apply_actions(&output11(0x0001_0000, 0));
        let mut out = Ofpacts::new();
        let err = pull_openflow11_instructions(&wire, wire.len(), &mut out).unwrap_err();
        assert_eq!(Error::BadOutPort, err);
        assert!(out.as_bytes().is_empty());
    }
}
