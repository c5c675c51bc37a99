/*!
The autopath sub-codec.

Autopath writes a port number chosen from a bond into a destination
sub-field. The destination needs room for any port number, so it must be
at least 16 bits wide.
*/

use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};
use crate::flow::Flow;
use crate::meta_flow::{self, encode_ofs_nbits, SubField};

use super::wire::{put_nx_header, put_u16, put_u32, put_zeros};
use super::wire::{NXAST_AUTOPATH, NX_ACTION_AUTOPATH_LEN};
use super::{Compat, Ofpact, Ofpacts};

pub fn from_wire(a: &[u8], out: &mut Ofpacts) -> Result<()> {
    let (ofs, n_bits) = meta_flow::decode_ofs_nbits(NetworkEndian::read_u16(&a[10..]));
    let dst = SubField::from_nxm(NetworkEndian::read_u32(&a[12..]), ofs, n_bits)?;
    meta_flow::check_dst(&dst, None)?;
    if n_bits < 16 {
        return Err(Error::BadArgument);
    }
    let port = NetworkEndian::read_u32(&a[16..]);
    out.push(Compat::None, &Ofpact::Autopath { dst, port });
    Ok(())
}

pub fn to_wire(dst: &SubField, port: u32, out: &mut Vec<u8>) {
    put_nx_header(out, NXAST_AUTOPATH, NX_ACTION_AUTOPATH_LEN);
    put_u16::<NetworkEndian>(out, encode_ofs_nbits(dst.ofs, dst.n_bits));
    put_u32::<NetworkEndian>(out, dst.field.nxm_header());
    put_u32::<NetworkEndian>(out, port);
    put_zeros(out, 4);
}

pub fn check(dst: &SubField, flow: &Flow) -> Result<()> {
    meta_flow::check_dst(dst, Some(flow))
}

/// Appends the `autopath(port,DST)` rendering.
pub fn format(dst: &SubField, port: u32, s: &mut String) {
    s.push_str(&format!("autopath({},", port));
    meta_flow::format_subfield(dst, s);
    s.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta_flow::MfField;

    #[test]
    fn round_trip() {
        let dst = SubField::new(MfField::Reg0, 0, 16);
        let mut wire = vec![];
        to_wire(&dst, 5, &mut wire);
        assert_eq!(NX_ACTION_AUTOPATH_LEN, wire.len());

        let mut out = Ofpacts::new();
        assert_eq!(Ok(()), from_wire(&wire, &mut out));
        out.terminate();
        let rec = out.iter().next().unwrap();
        assert_eq!(Ofpact::Autopath { dst, port: 5 }, rec.action);
    }

    #[test]
    fn narrow_destination_is_rejected() {
        let dst = SubField::new(MfField::Reg0, 0, 8);
        let mut wire = vec![];
        to_wire(&dst, 5, &mut wire);
        let mut out = Ofpacts::new();
        assert_eq!(Err(Error::BadArgument), from_wire(&wire, &mut out));
    }
}
