/*!
Wire-level constants for both action dialects, the Nicira extension
subtype space and the OpenFlow 1.1 instruction set, plus the byte
helpers shared by the serializers.

All sizes are the full struct sizes including the `{type, len}` header.
*/

use byteorder::ByteOrder;

/// Required alignment of every wire action.
pub const OFP_ACTION_ALIGN: usize = 8;
/// Required alignment of every OpenFlow 1.1 instruction.
pub const OFP11_INSTRUCTION_ALIGN: usize = 8;

/* OpenFlow 1.0 action types. */
pub const OFPAT10_OUTPUT: u16 = 0;
pub const OFPAT10_SET_VLAN_VID: u16 = 1;
pub const OFPAT10_SET_VLAN_PCP: u16 = 2;
pub const OFPAT10_STRIP_VLAN: u16 = 3;
pub const OFPAT10_SET_DL_SRC: u16 = 4;
pub const OFPAT10_SET_DL_DST: u16 = 5;
pub const OFPAT10_SET_NW_SRC: u16 = 6;
pub const OFPAT10_SET_NW_DST: u16 = 7;
pub const OFPAT10_SET_NW_TOS: u16 = 8;
pub const OFPAT10_SET_TP_SRC: u16 = 9;
pub const OFPAT10_SET_TP_DST: u16 = 10;
pub const OFPAT10_ENQUEUE: u16 = 11;
pub const OFPAT10_VENDOR: u16 = 0xffff;

/* OpenFlow 1.1 action types. */
pub const OFPAT11_OUTPUT: u16 = 0;
pub const OFPAT11_SET_VLAN_VID: u16 = 1;
pub const OFPAT11_SET_VLAN_PCP: u16 = 2;
pub const OFPAT11_SET_DL_SRC: u16 = 3;
pub const OFPAT11_SET_DL_DST: u16 = 4;
pub const OFPAT11_SET_NW_SRC: u16 = 5;
pub const OFPAT11_SET_NW_DST: u16 = 6;
pub const OFPAT11_SET_NW_TOS: u16 = 7;
pub const OFPAT11_SET_TP_SRC: u16 = 9;
pub const OFPAT11_SET_TP_DST: u16 = 10;
pub const OFPAT11_EXPERIMENTER: u16 = 0xffff;

/* Fixed struct sizes. */
pub const OFP10_ACTION_OUTPUT_LEN: usize = 8;
pub const OFP11_ACTION_OUTPUT_LEN: usize = 16;
pub const OFP_ACTION_VLAN_VID_LEN: usize = 8;
pub const OFP_ACTION_VLAN_PCP_LEN: usize = 8;
pub const OFP_ACTION_HEADER_LEN: usize = 8;
pub const OFP_ACTION_DL_ADDR_LEN: usize = 16;
pub const OFP_ACTION_NW_ADDR_LEN: usize = 8;
pub const OFP_ACTION_NW_TOS_LEN: usize = 8;
pub const OFP_ACTION_TP_PORT_LEN: usize = 8;
pub const OFP_ACTION_ENQUEUE_LEN: usize = 16;

/// The Nicira vendor id.
pub const NX_VENDOR_ID: u32 = 0x0000_2320;

/// Size of the generic vendor action header `{type, len, vendor,
/// subtype, pad[6]}`. Subtype-specific payloads begin at
/// `NX_ACTION_PAYLOAD_OFS` inside it.
pub const NX_ACTION_HEADER_LEN: usize = 16;
pub const NX_ACTION_PAYLOAD_OFS: usize = 10;

/* Nicira extension action subtypes. */
pub const NXAST_SNAT_OBSOLETE: u16 = 0;
pub const NXAST_RESUBMIT: u16 = 1;
pub const NXAST_SET_TUNNEL: u16 = 2;
pub const NXAST_DROP_SPOOFED_ARP_OBSOLETE: u16 = 3;
pub const NXAST_SET_QUEUE: u16 = 4;
pub const NXAST_POP_QUEUE: u16 = 5;
pub const NXAST_REG_MOVE: u16 = 6;
pub const NXAST_REG_LOAD: u16 = 7;
pub const NXAST_NOTE: u16 = 8;
pub const NXAST_SET_TUNNEL64: u16 = 9;
pub const NXAST_MULTIPATH: u16 = 10;
pub const NXAST_AUTOPATH: u16 = 11;
pub const NXAST_BUNDLE: u16 = 12;
pub const NXAST_BUNDLE_LOAD: u16 = 13;
pub const NXAST_RESUBMIT_TABLE: u16 = 14;
pub const NXAST_OUTPUT_REG: u16 = 15;
pub const NXAST_LEARN: u16 = 16;
pub const NXAST_EXIT: u16 = 17;
pub const NXAST_DEC_TTL: u16 = 18;
pub const NXAST_FIN_TIMEOUT: u16 = 19;
pub const NXAST_CONTROLLER: u16 = 20;

/* Nicira extension struct sizes. */
pub const NX_ACTION_RESUBMIT_LEN: usize = 16;
pub const NX_ACTION_SET_TUNNEL_LEN: usize = 16;
pub const NX_ACTION_SET_TUNNEL64_LEN: usize = 24;
pub const NX_ACTION_SET_QUEUE_LEN: usize = 16;
pub const NX_ACTION_POP_QUEUE_LEN: usize = 16;
pub const NX_ACTION_REG_MOVE_LEN: usize = 24;
pub const NX_ACTION_REG_LOAD_LEN: usize = 24;
pub const NX_ACTION_NOTE_LEN: usize = 16;
pub const NX_ACTION_MULTIPATH_LEN: usize = 32;
pub const NX_ACTION_AUTOPATH_LEN: usize = 24;
pub const NX_ACTION_BUNDLE_LEN: usize = 32;
pub const NX_ACTION_OUTPUT_REG_LEN: usize = 24;
pub const NX_ACTION_LEARN_LEN: usize = 32;
pub const NX_ACTION_FIN_TIMEOUT_LEN: usize = 16;
pub const NX_ACTION_CONTROLLER_LEN: usize = 16;

/* OpenFlow 1.1 instruction types. */
pub const OFPIT11_GOTO_TABLE: u16 = 1;
pub const OFPIT11_WRITE_METADATA: u16 = 2;
pub const OFPIT11_WRITE_ACTIONS: u16 = 3;
pub const OFPIT11_APPLY_ACTIONS: u16 = 4;
pub const OFPIT11_CLEAR_ACTIONS: u16 = 5;
pub const OFPIT11_EXPERIMENTER: u16 = 0xffff;

/* OpenFlow 1.1 instruction struct sizes. */
pub const OFP11_INSTRUCTION_LEN: usize = 8;
pub const OFP11_INSTRUCTION_GOTO_TABLE_LEN: usize = 8;
pub const OFP11_INSTRUCTION_WRITE_METADATA_LEN: usize = 24;
pub const OFP11_INSTRUCTION_ACTIONS_LEN: usize = 8;

/// Reason byte of a controller action that was an explicit `output`.
pub const OFPR_ACTION: u8 = 1;

/// Appends a `u16` in the given byte order.
pub fn put_u16<B: ByteOrder>(out: &mut Vec<u8>, v: u16) {
    let mut buf = [0; 2];
    B::write_u16(&mut buf, v);
    out.extend_from_slice(&buf);
}

/// Appends a `u32` in the given byte order.
pub fn put_u32<B: ByteOrder>(out: &mut Vec<u8>, v: u32) {
    let mut buf = [0; 4];
    B::write_u32(&mut buf, v);
    out.extend_from_slice(&buf);
}

/// Appends a `u64` in the given byte order.
pub fn put_u64<B: ByteOrder>(out: &mut Vec<u8>, v: u64) {
    let mut buf = [0; 8];
    B::write_u64(&mut buf, v);
    out.extend_from_slice(&buf);
}

/// Appends `n` zero bytes.
pub fn put_zeros(out: &mut Vec<u8>, n: usize) {
    out.resize(out.len() + n, 0);
}

/// Whether every byte of `bytes` is zero.
pub fn is_all_zeros(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == 0)
}

/// Rounds `n` up to the next multiple of `align`.
pub fn round_up(n: usize, align: usize) -> usize {
    (n + align - 1) / align * align
}

/// Appends the generic vendor action header `{type, len, vendor,
/// subtype}`. The caller appends the subtype-specific payload; `len`
/// must cover the final record.
pub fn put_nx_header(out: &mut Vec<u8>, subtype: u16, len: usize) {
    use byteorder::NetworkEndian;

    put_u16::<NetworkEndian>(out, 0xffff);
    put_u16::<NetworkEndian>(out, len as u16);
    put_u32::<NetworkEndian>(out, NX_VENDOR_ID);
    put_u16::<NetworkEndian>(out, subtype);
}
