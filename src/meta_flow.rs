/*!
The match-field registry and sub-field descriptors.

Register actions address a contiguous bit range inside a named match
field. On the wire such a range travels as an NXM field header plus a
packed `(ofs << 6) | (n_bits - 1)` descriptor; internally it is a
`SubField`. This module owns the closed field catalogue and the
readable/writable checks against a flow's match prerequisites.
*/

use crate::error::{Error, Result};
use crate::flow::{Flow, ETH_TYPE_IP};

/// The closed set of match fields addressable by sub-field actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MfField {
    /// Switch input port
    InPort = 0,
    /// Ethernet source address
    EthSrc = 1,
    /// Ethernet destination address
    EthDst = 2,
    /// Ethernet frame type
    EthType = 3,
    /// VLAN tag control information
    VlanTci = 4,
    /// IPv4 source address
    IpSrc = 5,
    /// IPv4 destination address
    IpDst = 6,
    /// Tunnel id
    TunId = 7,
    /// Scratch register 0
    Reg0 = 8,
    /// Scratch register 1
    Reg1 = 9,
    /// Scratch register 2
    Reg2 = 10,
    /// Scratch register 3
    Reg3 = 11,
}

/// Match prerequisite a flow must satisfy before a field is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prereq {
    None,
    Ipv4,
}

struct MfInfo {
    field: MfField,
    nxm_header: u32,
    n_bits: u16,
    name: &'static str,
    writable: bool,
    prereq: Prereq,
}

/* Indexed by the `MfField` discriminant. */
static MF_FIELDS: [MfInfo; 12] = [
    MfInfo {
        field: MfField::InPort,
        nxm_header: 0x0000_0002,
        n_bits: 16,
        name: "NXM_OF_IN_PORT",
        writable: false,
        prereq: Prereq::None,
    },
    MfInfo {
        field: MfField::EthSrc,
        nxm_header: 0x0000_0406,
        n_bits: 48,
        name: "NXM_OF_ETH_SRC",
        writable: true,
        prereq: Prereq::None,
    },
    MfInfo {
        field: MfField::EthDst,
        nxm_header: 0x0000_0206,
        n_bits: 48,
        name: "NXM_OF_ETH_DST",
        writable: true,
        prereq: Prereq::None,
    },
    MfInfo {
        field: MfField::EthType,
        nxm_header: 0x0000_0602,
        n_bits: 16,
        name: "NXM_OF_ETH_TYPE",
        writable: false,
        prereq: Prereq::None,
    },
    MfInfo {
        field: MfField::VlanTci,
        nxm_header: 0x0000_0802,
        n_bits: 16,
        name: "NXM_OF_VLAN_TCI",
        writable: true,
        prereq: Prereq::None,
    },
    MfInfo {
        field: MfField::IpSrc,
        nxm_header: 0x0000_0e04,
        n_bits: 32,
        name: "NXM_OF_IP_SRC",
        writable: true,
        prereq: Prereq::Ipv4,
    },
    MfInfo {
        field: MfField::IpDst,
        nxm_header: 0x0000_1004,
        n_bits: 32,
        name: "NXM_OF_IP_DST",
        writable: true,
        prereq: Prereq::Ipv4,
    },
    MfInfo {
        field: MfField::TunId,
        nxm_header: 0x0001_2008,
        n_bits: 64,
        name: "NXM_NX_TUN_ID",
        writable: true,
        prereq: Prereq::None,
    },
    MfInfo {
        field: MfField::Reg0,
        nxm_header: 0x0001_0004,
        n_bits: 32,
        name: "NXM_NX_REG0",
        writable: true,
        prereq: Prereq::None,
    },
    MfInfo {
        field: MfField::Reg1,
        nxm_header: 0x0001_0204,
        n_bits: 32,
        name: "NXM_NX_REG1",
        writable: true,
        prereq: Prereq::None,
    },
    MfInfo {
        field: MfField::Reg2,
        nxm_header: 0x0001_0404,
        n_bits: 32,
        name: "NXM_NX_REG2",
        writable: true,
        prereq: Prereq::None,
    },
    MfInfo {
        field: MfField::Reg3,
        nxm_header: 0x0001_0604,
        n_bits: 32,
        name: "NXM_NX_REG3",
        writable: true,
        prereq: Prereq::None,
    },
];

impl MfField {
    /// Looks up a field by its NXM wire header.
    pub fn from_nxm_header(header: u32) -> Option<MfField> {
        MF_FIELDS
            .iter()
            .find(|info| info.nxm_header == header)
            .map(|info| info.field)
    }

    pub(crate) fn from_raw(raw: u16) -> Option<MfField> {
        MF_FIELDS
            .iter()
            .map(|info| info.field)
            .find(|&f| f as u16 == raw)
    }

    fn info(self) -> &'static MfInfo {
        &MF_FIELDS[self as usize]
    }

    /// The field's NXM wire header.
    pub fn nxm_header(self) -> u32 {
        self.info().nxm_header
    }

    /// The field's width in bits.
    pub fn n_bits(self) -> u16 {
        self.info().n_bits
    }

    /// The field's canonical NXM name.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Whether actions may modify the field.
    pub fn is_writable(self) -> bool {
        self.info().writable
    }

    fn prereq_ok(self, flow: &Flow) -> bool {
        match self.info().prereq {
            Prereq::None => true,
            Prereq::Ipv4 => flow.dl_type == ETH_TYPE_IP,
        }
    }
}

/// A contiguous bit range inside a match field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubField {
    /// The field the range lives in
    pub field: MfField,
    /// Offset of the least significant addressed bit
    pub ofs: u16,
    /// Number of addressed bits, at least 1
    pub n_bits: u16,
}

impl SubField {
    /// Constructs a sub-field covering `n_bits` bits starting at `ofs`.
    pub fn new(field: MfField, ofs: u16, n_bits: u16) -> SubField {
        SubField { field, ofs, n_bits }
    }

    /// Resolves a wire NXM field header into a sub-field. An unknown
    /// header is `BadArgument`.
    pub fn from_nxm(header: u32, ofs: u16, n_bits: u16) -> Result<SubField> {
        match MfField::from_nxm_header(header) {
            Some(field) => Ok(SubField { field, ofs, n_bits }),
            None => Err(Error::BadArgument),
        }
    }
}

/// Unpacks a wire `(ofs << 6) | (n_bits - 1)` descriptor.
pub fn decode_ofs_nbits(v: u16) -> (u16, u16) {
    (v >> 6, (v & 0x3f) + 1)
}

/// Packs `(ofs, n_bits)` into the wire descriptor form.
pub fn encode_ofs_nbits(ofs: u16, n_bits: u16) -> u16 {
    (ofs << 6) | (n_bits - 1)
}

fn check_range(sf: &SubField) -> Result<()> {
    // widen before adding: both halves come straight off the wire
    if sf.n_bits == 0
        || u32::from(sf.ofs) + u32::from(sf.n_bits) > u32::from(sf.field.n_bits())
    {
        return Err(Error::BadArgument);
    }
    Ok(())
}

/// Checks that `sf` is a readable bit range. With a flow given, the
/// field's match prerequisites must hold as well.
pub fn check_src(sf: &SubField, flow: Option<&Flow>) -> Result<()> {
    check_range(sf)?;
    if let Some(flow) = flow {
        if !sf.field.prereq_ok(flow) {
            return Err(Error::BadArgument);
        }
    }
    Ok(())
}

/// Like `check_src`, but the field must also be writable.
pub fn check_dst(sf: &SubField, flow: Option<&Flow>) -> Result<()> {
    if !sf.field.is_writable() {
        return Err(Error::BadArgument);
    }
    check_src(sf, flow)
}

/// Appends the canonical `NAME[ofs..end]` rendering of `sf`.
pub fn format_subfield(sf: &SubField, s: &mut String) {
    s.push_str(sf.field.name());
    if sf.ofs == 0 && sf.n_bits == sf.field.n_bits() {
        s.push_str("[]");
    } else if sf.n_bits == 1 {
        s.push_str(&format!("[{}]", sf.ofs));
    } else {
        s.push_str(&format!("[{}..{}]", sf.ofs, sf.ofs + sf.n_bits - 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_order_matches_discriminants() {
        for (i, info) in MF_FIELDS.iter().enumerate() {
            assert_eq!(i, info.field as usize);
        }
    }

    #[test]
    fn header_round_trip() {
        for info in &MF_FIELDS {
            assert_eq!(Some(info.field), MfField::from_nxm_header(info.nxm_header));
            assert_eq!(info.nxm_header, info.field.nxm_header());
        }
        assert_eq!(None, MfField::from_nxm_header(0xdead_beef));
    }

    #[test]
    fn ofs_nbits_packing() {
        assert_eq!((0, 16), decode_ofs_nbits(encode_ofs_nbits(0, 16)));
        assert_eq!((100, 1), decode_ofs_nbits(encode_ofs_nbits(100, 1)));
        assert_eq!(0x0f, encode_ofs_nbits(0, 16));
    }

    #[test]
    fn range_bounds() {
        let ok = SubField::new(MfField::Reg0, 4, 28);
        assert_eq!(Ok(()), check_src(&ok, None));
        let too_wide = SubField::new(MfField::Reg0, 4, 29);
        assert_eq!(Err(Error::BadArgument), check_src(&too_wide, None));
        let empty = SubField::new(MfField::Reg0, 0, 0);
        assert_eq!(Err(Error::BadArgument), check_src(&empty, None));
    }

    #[test]
    fn writability() {
        let in_port = SubField::new(MfField::InPort, 0, 16);
        assert_eq!(Ok(()), check_src(&in_port, None));
        assert_eq!(Err(Error::BadArgument), check_dst(&in_port, None));
    }

    #[test]
    fn ip_prerequisite() {
        let sf = SubField::new(MfField::IpSrc, 0, 32);
        let mut flow = Flow::default();
        assert_eq!(Err(Error::BadArgument), check_src(&sf, Some(&flow)));
        flow.dl_type = ETH_TYPE_IP;
        assert_eq!(Ok(()), check_src(&sf, Some(&flow)));
    }

    #[test]
    fn subfield_rendering() {
        let mut s = String::new();
        format_subfield(&SubField::new(MfField::Reg0, 0, 32), &mut s);
        assert_eq!("NXM_NX_REG0[]", s);
        s.clear();
        format_subfield(&SubField::new(MfField::VlanTci, 0, 12), &mut s);
        assert_eq!("NXM_OF_VLAN_TCI[0..11]", s);
        s.clear();
        format_subfield(&SubField::new(MfField::Reg1, 5, 1), &mut s);
        assert_eq!("NXM_NX_REG1[5]", s);
    }
}
