/*!
The register move and register load sub-codec.

A move copies a bit range between two match fields; a load writes an
immediate value into one. Both address their targets with sub-field
descriptors, so most of the validation work delegates to the match-field
registry.
*/

use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};
use crate::flow::Flow;
use crate::meta_flow::{self, encode_ofs_nbits, SubField};

use super::wire::{put_nx_header, put_u16, put_u32, put_u64};
use super::wire::{NXAST_REG_LOAD, NXAST_REG_MOVE, NX_ACTION_REG_LOAD_LEN, NX_ACTION_REG_MOVE_LEN};
use super::{Compat, Ofpact, Ofpacts};

/// Decodes a register move. Both bit ranges must already be valid
/// without a flow context; prerequisite checks happen at validation
/// time.
pub fn move_from_wire(a: &[u8], out: &mut Ofpacts) -> Result<()> {
    let n_bits = NetworkEndian::read_u16(&a[10..]);
    let src_ofs = NetworkEndian::read_u16(&a[12..]);
    let dst_ofs = NetworkEndian::read_u16(&a[14..]);
    let src = SubField::from_nxm(NetworkEndian::read_u32(&a[16..]), src_ofs, n_bits)?;
    let dst = SubField::from_nxm(NetworkEndian::read_u32(&a[20..]), dst_ofs, n_bits)?;
    meta_flow::check_src(&src, None)?;
    meta_flow::check_dst(&dst, None)?;
    out.push(Compat::None, &Ofpact::RegMove { src, dst });
    Ok(())
}

/// Encodes a register move.
pub fn move_to_wire(src: &SubField, dst: &SubField, out: &mut Vec<u8>) {
    put_nx_header(out, NXAST_REG_MOVE, NX_ACTION_REG_MOVE_LEN);
    put_u16::<NetworkEndian>(out, src.n_bits);
    put_u16::<NetworkEndian>(out, src.ofs);
    put_u16::<NetworkEndian>(out, dst.ofs);
    put_u32::<NetworkEndian>(out, src.field.nxm_header());
    put_u32::<NetworkEndian>(out, dst.field.nxm_header());
}

/// Validates a register move against a flow context.
pub fn move_check(src: &SubField, dst: &SubField, flow: &Flow) -> Result<()> {
    meta_flow::check_src(src, Some(flow))?;
    meta_flow::check_dst(dst, Some(flow))
}

/// Appends the `move:SRC->DST` rendering.
pub fn move_format(src: &SubField, dst: &SubField, s: &mut String) {
    s.push_str("move:");
    meta_flow::format_subfield(src, s);
    s.push_str("->");
    meta_flow::format_subfield(dst, s);
}

/// Decodes a register load. The immediate value must fit into the
/// destination bit range.
pub fn load_from_wire(a: &[u8], out: &mut Ofpacts) -> Result<()> {
    let (ofs, n_bits) = meta_flow::decode_ofs_nbits(NetworkEndian::read_u16(&a[10..]));
    let dst = SubField::from_nxm(NetworkEndian::read_u32(&a[12..]), ofs, n_bits)?;
    meta_flow::check_dst(&dst, None)?;
    let value = NetworkEndian::read_u64(&a[16..]);
    if n_bits < 64 && value >> n_bits != 0 {
        return Err(Error::BadArgument);
    }
    out.push(Compat::None, &Ofpact::RegLoad { dst, value });
    Ok(())
}

/// Encodes a register load.
pub fn load_to_wire(dst: &SubField, value: u64, out: &mut Vec<u8>) {
    put_nx_header(out, NXAST_REG_LOAD, NX_ACTION_REG_LOAD_LEN);
    put_u16::<NetworkEndian>(out, encode_ofs_nbits(dst.ofs, dst.n_bits));
    put_u32::<NetworkEndian>(out, dst.field.nxm_header());
    put_u64::<NetworkEndian>(out, value);
}

/// Validates a register load against a flow context.
pub fn load_check(dst: &SubField, flow: &Flow) -> Result<()> {
    meta_flow::check_dst(dst, Some(flow))
}

/// Appends the `load:VALUE->DST` rendering.
pub fn load_format(dst: &SubField, value: u64, s: &mut String) {
    s.push_str(&format!("load:{:#x}->", value));
    meta_flow::format_subfield(dst, s);
}
