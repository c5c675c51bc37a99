/*!
The bundle sub-codec.

A bundle picks one live slave port out of a list, either outputting to
it directly (`bundle`) or storing it in a destination sub-field
(`bundle_load`). The wire struct has a fixed 32-byte part followed by
the slave ports, padded to the action alignment.
*/

use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};
use crate::flow::Flow;
use crate::meta_flow::{self, encode_ofs_nbits, MfField, SubField};
use crate::ports;

use super::wire::{is_all_zeros, put_nx_header, put_u16, put_u32, put_zeros, round_up};
use super::wire::{NXAST_BUNDLE, NXAST_BUNDLE_LOAD, NX_ACTION_BUNDLE_LEN, OFP_ACTION_ALIGN};
use super::{Compat, Ofpact, Ofpacts};

/// Highest valid slave-selection algorithm (`active_backup`, `hrw`).
const NX_BD_ALG_MAX: u16 = 1;
/// Highest valid hash-fields selector.
const NX_HASH_FIELDS_MAX: u16 = 1;

/// Decodes a bundle action. `subtype` distinguishes `bundle` from
/// `bundle_load`; only the latter carries a destination sub-field.
pub fn from_wire(a: &[u8], subtype: u16, out: &mut Ofpacts) -> Result<()> {
    let algorithm = NetworkEndian::read_u16(&a[10..]);
    let hash_fields = NetworkEndian::read_u16(&a[12..]);
    let basis = NetworkEndian::read_u16(&a[14..]);
    let slave_type = NetworkEndian::read_u32(&a[16..]);
    let n_slaves = NetworkEndian::read_u16(&a[20..]) as usize;
    let ofs_nbits = NetworkEndian::read_u16(&a[22..]);
    let dst_header = NetworkEndian::read_u32(&a[24..]);

    if !is_all_zeros(&a[28..32]) {
        return Err(Error::BadArgument);
    }
    if slave_type != MfField::InPort.nxm_header() {
        return Err(Error::BadArgument);
    }
    if algorithm > NX_BD_ALG_MAX || hash_fields > NX_HASH_FIELDS_MAX {
        return Err(Error::BadArgument);
    }

    let dst = if subtype == NXAST_BUNDLE_LOAD {
        let (ofs, n_bits) = meta_flow::decode_ofs_nbits(ofs_nbits);
        let sf = SubField::from_nxm(dst_header, ofs, n_bits)?;
        meta_flow::check_dst(&sf, None)?;
        Some(sf)
    } else {
        if ofs_nbits != 0 || dst_header != 0 {
            return Err(Error::BadArgument);
        }
        None
    };

    // the slave list must account for exactly the rest of the action
    let slaves_size = a.len() - NX_ACTION_BUNDLE_LEN;
    if slaves_size < 2 * n_slaves || slaves_size >= 2 * n_slaves + OFP_ACTION_ALIGN {
        return Err(Error::BadLen);
    }
    let slaves = (0..n_slaves)
        .map(|i| NetworkEndian::read_u16(&a[NX_ACTION_BUNDLE_LEN + 2 * i..]))
        .collect();

    out.push(
        Compat::None,
        &Ofpact::Bundle {
            algorithm,
            hash_fields,
            basis,
            dst,
            slaves,
        },
    );
    Ok(())
}

/// Encodes a bundle action; the subtype follows from whether a
/// destination sub-field is present.
pub fn to_wire(
    algorithm: u16,
    hash_fields: u16,
    basis: u16,
    dst: Option<&SubField>,
    slaves: &[u16],
    out: &mut Vec<u8>,
) {
    let len = NX_ACTION_BUNDLE_LEN + round_up(2 * slaves.len(), OFP_ACTION_ALIGN);
    let subtype = match dst {
        Some(_) => NXAST_BUNDLE_LOAD,
        None => NXAST_BUNDLE,
    };
    put_nx_header(out, subtype, len);
    put_u16::<NetworkEndian>(out, algorithm);
    put_u16::<NetworkEndian>(out, hash_fields);
    put_u16::<NetworkEndian>(out, basis);
    put_u32::<NetworkEndian>(out, MfField::InPort.nxm_header());
    put_u16::<NetworkEndian>(out, slaves.len() as u16);
    match dst {
        Some(sf) => {
            put_u16::<NetworkEndian>(out, encode_ofs_nbits(sf.ofs, sf.n_bits));
            put_u32::<NetworkEndian>(out, sf.field.nxm_header());
        }
        None => {
            put_u16::<NetworkEndian>(out, 0);
            put_u32::<NetworkEndian>(out, 0);
        }
    }
    put_zeros(out, 4);
    for &slave in slaves {
        put_u16::<NetworkEndian>(out, slave);
    }
    put_zeros(out, round_up(2 * slaves.len(), OFP_ACTION_ALIGN) - 2 * slaves.len());
}

/// Validates a bundle against a flow context and the switch port count.
pub fn check(dst: Option<&SubField>, slaves: &[u16], flow: &Flow, max_ports: u16) -> Result<()> {
    if let Some(sf) = dst {
        meta_flow::check_dst(sf, Some(flow))?;
    }
    for &slave in slaves {
        ports::check_output_port(slave, max_ports)?;
    }
    Ok(())
}

fn fields_name(hash_fields: u16) -> &'static str {
    match hash_fields {
        0 => "eth_src",
        _ => "symmetric_l4",
    }
}

fn algorithm_name(algorithm: u16) -> &'static str {
    match algorithm {
        0 => "active_backup",
        _ => "hrw",
    }
}

/// Appends the `bundle(...)` or `bundle_load(...)` rendering.
pub fn format(
    algorithm: u16,
    hash_fields: u16,
    basis: u16,
    dst: Option<&SubField>,
    slaves: &[u16],
    s: &mut String,
) {
    let name = match dst {
        Some(_) => "bundle_load",
        None => "bundle",
    };
    s.push_str(&format!(
        "{}({},{},{},ofport,",
        name,
        fields_name(hash_fields),
        basis,
        algorithm_name(algorithm)
    ));
    if let Some(sf) = dst {
        meta_flow::format_subfield(sf, s);
        s.push(',');
    }
    s.push_str("slaves:");
    for (i, slave) in slaves.iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        s.push_str(&slave.to_string());
    }
    s.push(')');
}
