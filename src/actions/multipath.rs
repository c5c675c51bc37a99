/*!
The multipath sub-codec.

Multipath hashes selected flow fields, maps the hash onto one of
`max_link + 1` links with the configured algorithm and stores the chosen
link index in a destination sub-field.
*/

use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};
use crate::flow::Flow;
use crate::meta_flow::{self, encode_ofs_nbits, SubField};

use super::wire::{is_all_zeros, put_nx_header, put_u16, put_u32, put_zeros};
use super::wire::{NXAST_MULTIPATH, NX_ACTION_MULTIPATH_LEN};
use super::{Compat, Ofpact, Ofpacts};

/// Highest valid hash-fields selector (`eth_src`, `symmetric_l4`).
const NX_HASH_FIELDS_MAX: u16 = 1;
/// Highest valid algorithm (`modulo_n`, `hash_threshold`, `hrw`,
/// `iter_hash`).
const NX_MP_ALG_MAX: u16 = 3;

pub fn from_wire(a: &[u8], out: &mut Ofpacts) -> Result<()> {
    if !is_all_zeros(&a[14..16]) || !is_all_zeros(&a[24..26]) {
        return Err(Error::BadArgument);
    }
    let hash_fields = NetworkEndian::read_u16(&a[10..]);
    let basis = NetworkEndian::read_u16(&a[12..]);
    let algorithm = NetworkEndian::read_u16(&a[16..]);
    let max_link = NetworkEndian::read_u16(&a[18..]);
    let arg = NetworkEndian::read_u32(&a[20..]);
    if hash_fields > NX_HASH_FIELDS_MAX || algorithm > NX_MP_ALG_MAX {
        return Err(Error::BadArgument);
    }
    let (ofs, n_bits) = meta_flow::decode_ofs_nbits(NetworkEndian::read_u16(&a[26..]));
    let dst = SubField::from_nxm(NetworkEndian::read_u32(&a[28..]), ofs, n_bits)?;
    meta_flow::check_dst(&dst, None)?;
    // the largest link index must be representable in the destination
    if n_bits < 16 && u32::from(max_link) >> n_bits != 0 {
        return Err(Error::BadArgument);
    }
    out.push(
        Compat::None,
        &Ofpact::Multipath {
            hash_fields,
            basis,
            algorithm,
            max_link,
            arg,
            dst,
        },
    );
    Ok(())
}

pub fn to_wire(
    hash_fields: u16,
    basis: u16,
    algorithm: u16,
    max_link: u16,
    arg: u32,
    dst: &SubField,
    out: &mut Vec<u8>,
) {
    put_nx_header(out, NXAST_MULTIPATH, NX_ACTION_MULTIPATH_LEN);
    put_u16::<NetworkEndian>(out, hash_fields);
    put_u16::<NetworkEndian>(out, basis);
    put_zeros(out, 2);
    put_u16::<NetworkEndian>(out, algorithm);
    put_u16::<NetworkEndian>(out, max_link);
    put_u32::<NetworkEndian>(out, arg);
    put_zeros(out, 2);
    put_u16::<NetworkEndian>(out, encode_ofs_nbits(dst.ofs, dst.n_bits));
    put_u32::<NetworkEndian>(out, dst.field.nxm_header());
}

pub fn check(dst: &SubField, flow: &Flow) -> Result<()> {
    meta_flow::check_dst(dst, Some(flow))
}

fn fields_name(hash_fields: u16) -> &'static str {
    match hash_fields {
        0 => "eth_src",
        _ => "symmetric_l4",
    }
}

fn algorithm_name(algorithm: u16) -> &'static str {
    match algorithm {
        0 => "modulo_n",
        1 => "hash_threshold",
        2 => "hrw",
        _ => "iter_hash",
    }
}

/// Appends the `multipath(fields,basis,algorithm,n_links,arg,DST)`
/// rendering.
pub fn format(
    hash_fields: u16,
    basis: u16,
    algorithm: u16,
    max_link: u16,
    arg: u32,
    dst: &SubField,
    s: &mut String,
) {
    s.push_str(&format!(
        "multipath({},{},{},{},{},",
        fields_name(hash_fields),
        basis,
        algorithm_name(algorithm),
        u32::from(max_link) + 1,
        arg
    ));
    meta_flow::format_subfield(dst, s);
    s.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta_flow::MfField;

    fn sample_wire() -> Vec<u8> {
        let mut wire = vec![];
        to_wire(1, 50, 2, 15, 0, &SubField::new(MfField::Reg0, 0, 4), &mut wire);
        wire
    }

    #[test]
    fn round_trip() {
        let wire = sample_wire();
        assert_eq!(NX_ACTION_MULTIPATH_LEN, wire.len());
        let mut out = Ofpacts::new();
        assert_eq!(Ok(()), from_wire(&wire, &mut out));
        out.terminate();
        let rec = out.iter().next().unwrap();
        assert_eq!(
            Ofpact::Multipath {
                hash_fields: 1,
                basis: 50,
                algorithm: 2,
                max_link: 15,
                arg: 0,
                dst: SubField::new(MfField::Reg0, 0, 4),
            },
            rec.action
        );
    }

    #[test]
    fn reserved_bytes_must_be_zero() {
        let mut wire = sample_wire();
        wire[14] = 1;
        let mut out = Ofpacts::new();
        assert_eq!(Err(Error::BadArgument), from_wire(&wire, &mut out));
    }

    #[test]
    fn link_range_must_fit_destination() {
        let mut wire = vec![];
        // max_link 16 needs 5 bits, destination has 4
        to_wire(0, 0, 0, 16, 0, &SubField::new(MfField::Reg0, 0, 4), &mut wire);
        let mut out = Ofpacts::new();
        assert_eq!(Err(Error::BadArgument), from_wire(&wire, &mut out));
    }

    #[test]
    fn bad_algorithm() {
        let mut wire = vec![];
        to_wire(0, 0, 9, 1, 0, &SubField::new(MfField::Reg0, 0, 16), &mut wire);
        let mut out = Ofpacts::new();
        assert_eq!(Err(Error::BadArgument), from_wire(&wire, &mut out));
    }
}
