/*!
The internal action representation shared by every codec in this crate.

Wire actions from either OpenFlow dialect decode into one flat stream of
records packed into an `Ofpacts` buffer. Each record starts on an 8-byte
boundary with a native-order `{type, compat, len}` header; `len` counts
the header and the record's payload, excluding inter-record padding. The
stream ends with a single `End` record, and iteration stops there.

The byte layout is canonical: two streams decoded from the same wire
input are byte-identical, so stream comparison is `==` over the raw
buffers. Only this module reads or writes the internal layout; everything
else goes through the `Ofpact` variants the cursor yields.
*/

pub mod autopath;
pub mod bundle;
pub mod check;
pub mod deserialize;
pub mod format;
pub mod learn;
pub mod multipath;
pub mod reg;
pub mod serialize;
pub(crate) mod wire;

use byteorder::{ByteOrder, NativeEndian};

use crate::meta_flow::{MfField, SubField};
use crate::ports::OFPP_CONTROLLER;
use self::wire::{put_u16, put_u32, put_u64, put_zeros};

/// Alignment of every record in an `Ofpacts` buffer.
pub const OFPACT_ALIGN: usize = 8;

const OFPACT_HEADER_LEN: usize = 8;

/// The closed set of internal record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfpactType {
    /// Stream terminator
    End = 0,
    Output = 1,
    Controller = 2,
    Enqueue = 3,
    OutputReg = 4,
    Bundle = 5,
    SetVlanVid = 6,
    SetVlanPcp = 7,
    StripVlan = 8,
    SetEthSrc = 9,
    SetEthDst = 10,
    SetIpv4Src = 11,
    SetIpv4Dst = 12,
    SetIpv4Dscp = 13,
    SetL4SrcPort = 14,
    SetL4DstPort = 15,
    SetTunnel = 16,
    SetQueue = 17,
    PopQueue = 18,
    RegMove = 19,
    RegLoad = 20,
    DecTtl = 21,
    FinTimeout = 22,
    Resubmit = 23,
    Learn = 24,
    Multipath = 25,
    Autopath = 26,
    Note = 27,
    Exit = 28,
}

impl OfpactType {
    fn from_raw(raw: u16) -> OfpactType {
        match raw {
            0 => OfpactType::End,
            1 => OfpactType::Output,
            2 => OfpactType::Controller,
            3 => OfpactType::Enqueue,
            4 => OfpactType::OutputReg,
            5 => OfpactType::Bundle,
            6 => OfpactType::SetVlanVid,
            7 => OfpactType::SetVlanPcp,
            8 => OfpactType::StripVlan,
            9 => OfpactType::SetEthSrc,
            10 => OfpactType::SetEthDst,
            11 => OfpactType::SetIpv4Src,
            12 => OfpactType::SetIpv4Dst,
            13 => OfpactType::SetIpv4Dscp,
            14 => OfpactType::SetL4SrcPort,
            15 => OfpactType::SetL4DstPort,
            16 => OfpactType::SetTunnel,
            17 => OfpactType::SetQueue,
            18 => OfpactType::PopQueue,
            19 => OfpactType::RegMove,
            20 => OfpactType::RegLoad,
            21 => OfpactType::DecTtl,
            22 => OfpactType::FinTimeout,
            23 => OfpactType::Resubmit,
            24 => OfpactType::Learn,
            25 => OfpactType::Multipath,
            26 => OfpactType::Autopath,
            27 => OfpactType::Note,
            28 => OfpactType::Exit,
            other => unreachable!("corrupt action buffer: record type {}", other),
        }
    }
}

/// Remembers which wire subtype produced a record, so re-encoding can
/// pick the same wire shape among equivalent encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compat {
    /// No provenance worth keeping
    None = 0,
    /// Plain resubmit
    Resubmit = 1,
    /// Resubmit with an explicit table
    ResubmitTable = 2,
    /// 32-bit tunnel id encoding
    SetTunnel = 3,
    /// 64-bit tunnel id encoding
    SetTunnel64 = 4,
}

impl Compat {
    fn from_raw(raw: u16) -> Compat {
        match raw {
            0 => Compat::None,
            1 => Compat::Resubmit,
            2 => Compat::ResubmitTable,
            3 => Compat::SetTunnel,
            4 => Compat::SetTunnel64,
            other => unreachable!("corrupt action buffer: compat {}", other),
        }
    }
}

/// One decoded action. Variants with bulk payload borrow it from the
/// stream they were parsed out of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ofpact<'a> {
    Output {
        port: u16,
        max_len: u16,
    },
    Controller {
        max_len: u16,
        controller_id: u16,
        reason: u8,
    },
    Enqueue {
        port: u16,
        queue: u32,
    },
    OutputReg {
        src: SubField,
        max_len: u16,
    },
    Bundle {
        algorithm: u16,
        hash_fields: u16,
        basis: u16,
        dst: Option<SubField>,
        slaves: Vec<u16>,
    },
    SetVlanVid(u16),
    SetVlanPcp(u8),
    StripVlan,
    SetEthSrc([u8; 6]),
    SetEthDst([u8; 6]),
    SetIpv4Src(u32),
    SetIpv4Dst(u32),
    SetIpv4Dscp(u8),
    SetL4SrcPort(u16),
    SetL4DstPort(u16),
    SetTunnel(u64),
    SetQueue(u32),
    PopQueue,
    RegMove {
        src: SubField,
        dst: SubField,
    },
    RegLoad {
        dst: SubField,
        value: u64,
    },
    DecTtl,
    FinTimeout {
        idle_timeout: u16,
        hard_timeout: u16,
    },
    Resubmit {
        in_port: u16,
        table_id: u8,
    },
    Learn {
        idle_timeout: u16,
        hard_timeout: u16,
        priority: u16,
        flags: u16,
        cookie: u64,
        table_id: u8,
        specs: &'a [u8],
    },
    Multipath {
        hash_fields: u16,
        basis: u16,
        algorithm: u16,
        max_link: u16,
        arg: u32,
        dst: SubField,
    },
    Autopath {
        dst: SubField,
        port: u32,
    },
    Note(&'a [u8]),
    Exit,
}

/// A record as yielded by the cursor: the action plus its provenance tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub compat: Compat,
    pub action: Ofpact<'a>,
}

/// A packed, aligned, terminated stream of internal action records.
///
/// The buffer is caller-owned and reusable: decoders clear it, append
/// into it and clear it again on failure, so a failed call never leaves
/// partial output behind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ofpacts {
    buf: Vec<u8>,
}

impl Ofpacts {
    /// Constructs an empty buffer.
    pub fn new() -> Ofpacts {
        Ofpacts { buf: Vec::new() }
    }

    /// Discards all records.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// The raw bytes of the stream. The layout is canonical, so this is
    /// also the basis for equality.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Byte-wise stream equality.
    pub fn equal(&self, other: &Ofpacts) -> bool {
        self.buf == other.buf
    }

    /// Whether the stream holds no actions (only a terminator, or
    /// nothing at all).
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// A cursor over the records, stopping at the terminator.
    pub fn iter(&self) -> Iter {
        Iter {
            buf: &self.buf,
            ofs: 0,
        }
    }

    /// True iff some action sends packets to `port`: an output or an
    /// enqueue naming it, or any controller action when `port` is
    /// `OFPP_CONTROLLER`.
    pub fn outputs_to_port(&self, port: u16) -> bool {
        self.iter().any(|rec| match rec.action {
            Ofpact::Output { port: p, .. } => p == port,
            Ofpact::Enqueue { port: p, .. } => p == port,
            Ofpact::Controller { .. } => port == OFPP_CONTROLLER,
            _ => false,
        })
    }

    /// Appends the terminator. Must be the last record appended.
    pub fn terminate(&mut self) {
        self.put_header(OfpactType::End, Compat::None, OFPACT_HEADER_LEN);
    }

    /// Appends one record, padding to the record alignment first.
    pub fn push(&mut self, compat: Compat, action: &Ofpact) {
        match *action {
            Ofpact::Output { port, max_len } => {
                self.put_header(OfpactType::Output, compat, 12);
                self.put_u16(port);
                self.put_u16(max_len);
            }
            Ofpact::Controller {
                max_len,
                controller_id,
                reason,
            } => {
                self.put_header(OfpactType::Controller, compat, 13);
                self.put_u16(max_len);
                self.put_u16(controller_id);
                self.buf.push(reason);
            }
            Ofpact::Enqueue { port, queue } => {
                self.put_header(OfpactType::Enqueue, compat, 14);
                self.put_u16(port);
                self.put_u32(queue);
            }
            Ofpact::OutputReg { ref src, max_len } => {
                self.put_header(OfpactType::OutputReg, compat, 16);
                self.put_subfield(src);
                self.put_u16(max_len);
            }
            Ofpact::Bundle {
                algorithm,
                hash_fields,
                basis,
                ref dst,
                ref slaves,
            } => {
                let ofs = self.put_header(OfpactType::Bundle, compat, 22);
                self.put_u16(algorithm);
                self.put_u16(hash_fields);
                self.put_u16(basis);
                match *dst {
                    Some(ref sf) => self.put_subfield(sf),
                    None => {
                        self.put_u16(NO_FIELD);
                        self.put_u16(0);
                        self.put_u16(0);
                    }
                }
                self.put_u16(slaves.len() as u16);
                for &slave in slaves {
                    self.put_u16(slave);
                }
                self.update_len(ofs);
            }
            Ofpact::SetVlanVid(vid) => {
                self.put_header(OfpactType::SetVlanVid, compat, 10);
                self.put_u16(vid);
            }
            Ofpact::SetVlanPcp(pcp) => {
                self.put_header(OfpactType::SetVlanPcp, compat, 9);
                self.buf.push(pcp);
            }
            Ofpact::StripVlan => {
                self.put_header(OfpactType::StripVlan, compat, 8);
            }
            Ofpact::SetEthSrc(mac) => {
                self.put_header(OfpactType::SetEthSrc, compat, 14);
                self.buf.extend_from_slice(&mac);
            }
            Ofpact::SetEthDst(mac) => {
                self.put_header(OfpactType::SetEthDst, compat, 14);
                self.buf.extend_from_slice(&mac);
            }
            Ofpact::SetIpv4Src(ip) => {
                self.put_header(OfpactType::SetIpv4Src, compat, 12);
                self.put_u32(ip);
            }
            Ofpact::SetIpv4Dst(ip) => {
                self.put_header(OfpactType::SetIpv4Dst, compat, 12);
                self.put_u32(ip);
            }
            Ofpact::SetIpv4Dscp(dscp) => {
                self.put_header(OfpactType::SetIpv4Dscp, compat, 9);
                self.buf.push(dscp);
            }
            Ofpact::SetL4SrcPort(port) => {
                self.put_header(OfpactType::SetL4SrcPort, compat, 10);
                self.put_u16(port);
            }
            Ofpact::SetL4DstPort(port) => {
                self.put_header(OfpactType::SetL4DstPort, compat, 10);
                self.put_u16(port);
            }
            Ofpact::SetTunnel(tun_id) => {
                self.put_header(OfpactType::SetTunnel, compat, 16);
                put_u64::<NativeEndian>(&mut self.buf, tun_id);
            }
            Ofpact::SetQueue(queue_id) => {
                self.put_header(OfpactType::SetQueue, compat, 12);
                self.put_u32(queue_id);
            }
            Ofpact::PopQueue => {
                self.put_header(OfpactType::PopQueue, compat, 8);
            }
            Ofpact::RegMove { ref src, ref dst } => {
                self.put_header(OfpactType::RegMove, compat, 20);
                self.put_subfield(src);
                self.put_subfield(dst);
            }
            Ofpact::RegLoad { ref dst, value } => {
                self.put_header(OfpactType::RegLoad, compat, 22);
                self.put_subfield(dst);
                put_u64::<NativeEndian>(&mut self.buf, value);
            }
            Ofpact::DecTtl => {
                self.put_header(OfpactType::DecTtl, compat, 8);
            }
            Ofpact::FinTimeout {
                idle_timeout,
                hard_timeout,
            } => {
                self.put_header(OfpactType::FinTimeout, compat, 12);
                self.put_u16(idle_timeout);
                self.put_u16(hard_timeout);
            }
            Ofpact::Resubmit { in_port, table_id } => {
                self.put_header(OfpactType::Resubmit, compat, 11);
                self.put_u16(in_port);
                self.buf.push(table_id);
            }
            Ofpact::Learn {
                idle_timeout,
                hard_timeout,
                priority,
                flags,
                cookie,
                table_id,
                specs,
            } => {
                let ofs = self.put_header(OfpactType::Learn, compat, 28);
                self.put_u16(idle_timeout);
                self.put_u16(hard_timeout);
                self.put_u16(priority);
                self.put_u16(flags);
                put_u64::<NativeEndian>(&mut self.buf, cookie);
                self.buf.push(table_id);
                self.buf.push(0);
                self.put_u16(specs.len() as u16);
                self.buf.extend_from_slice(specs);
                self.update_len(ofs);
            }
            Ofpact::Multipath {
                hash_fields,
                basis,
                algorithm,
                max_link,
                arg,
                ref dst,
            } => {
                self.put_header(OfpactType::Multipath, compat, 26);
                self.put_u16(hash_fields);
                self.put_u16(basis);
                self.put_u16(algorithm);
                self.put_u16(max_link);
                self.put_u32(arg);
                self.put_subfield(dst);
            }
            Ofpact::Autopath { ref dst, port } => {
                self.put_header(OfpactType::Autopath, compat, 18);
                self.put_subfield(dst);
                self.put_u32(port);
            }
            Ofpact::Note(data) => {
                let ofs = self.put_header(OfpactType::Note, compat, 10);
                self.put_u16(data.len() as u16);
                self.buf.extend_from_slice(data);
                self.update_len(ofs);
            }
            Ofpact::Exit => {
                self.put_header(OfpactType::Exit, compat, 8);
            }
        }
    }

    /// Pads to the record alignment, appends a record header and
    /// remembers the record offset for `update_len`.
    fn put_header(&mut self, typ: OfpactType, compat: Compat, len: usize) -> usize {
        let rem = self.buf.len() % OFPACT_ALIGN;
        if rem != 0 {
            put_zeros(&mut self.buf, OFPACT_ALIGN - rem);
        }
        let ofs = self.buf.len();
        self.put_u16(typ as u16);
        self.put_u16(compat as u16);
        self.put_u16(len as u16);
        self.put_u16(0);
        ofs
    }

    /// Patches the header at `ofs` to cover everything appended since,
    /// for records whose payload follows the fixed part.
    fn update_len(&mut self, ofs: usize) {
        let len = self.buf.len() - ofs;
        NativeEndian::write_u16(&mut self.buf[ofs + 4..ofs + 6], len as u16);
    }

    fn put_u16(&mut self, v: u16) {
        put_u16::<NativeEndian>(&mut self.buf, v);
    }

    fn put_u32(&mut self, v: u32) {
        put_u32::<NativeEndian>(&mut self.buf, v);
    }

    fn put_subfield(&mut self, sf: &SubField) {
        self.put_u16(sf.field as u16);
        self.put_u16(sf.ofs);
        self.put_u16(sf.n_bits);
    }
}

/// The marker stored in place of a bundle destination field when the
/// bundle has none.
const NO_FIELD: u16 = 0xffff;

/// Cursor over the records of an `Ofpacts` buffer.
pub struct Iter<'a> {
    buf: &'a [u8],
    ofs: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Record<'a>> {
        let buf = self.buf;
        let mut ofs = self.ofs;
        let rem = ofs % OFPACT_ALIGN;
        if rem != 0 {
            ofs += OFPACT_ALIGN - rem;
        }
        if ofs + OFPACT_HEADER_LEN > buf.len() {
            return None;
        }
        let typ = OfpactType::from_raw(NativeEndian::read_u16(&buf[ofs..]));
        if typ == OfpactType::End {
            return None;
        }
        let compat = Compat::from_raw(NativeEndian::read_u16(&buf[ofs + 2..]));
        let len = NativeEndian::read_u16(&buf[ofs + 4..]) as usize;
        let rec = &buf[ofs..ofs + len];
        self.ofs = ofs + len;
        Some(Record {
            compat,
            action: parse_action(typ, rec),
        })
    }
}

fn read_subfield(rec: &[u8], ofs: usize) -> SubField {
    let raw = NativeEndian::read_u16(&rec[ofs..]);
    let field = match MfField::from_raw(raw) {
        Some(field) => field,
        None => unreachable!("corrupt action buffer: field {}", raw),
    };
    SubField {
        field,
        ofs: NativeEndian::read_u16(&rec[ofs + 2..]),
        n_bits: NativeEndian::read_u16(&rec[ofs + 4..]),
    }
}

fn parse_action(typ: OfpactType, rec: &[u8]) -> Ofpact {
    match typ {
        OfpactType::End => unreachable!("terminator is never parsed"),
        OfpactType::Output => Ofpact::Output {
            port: NativeEndian::read_u16(&rec[8..]),
            max_len: NativeEndian::read_u16(&rec[10..]),
        },
        OfpactType::Controller => Ofpact::Controller {
            max_len: NativeEndian::read_u16(&rec[8..]),
            controller_id: NativeEndian::read_u16(&rec[10..]),
            reason: rec[12],
        },
        OfpactType::Enqueue => Ofpact::Enqueue {
            port: NativeEndian::read_u16(&rec[8..]),
            queue: NativeEndian::read_u32(&rec[10..]),
        },
        OfpactType::OutputReg => Ofpact::OutputReg {
            src: read_subfield(rec, 8),
            max_len: NativeEndian::read_u16(&rec[14..]),
        },
        OfpactType::Bundle => {
            let dst = if NativeEndian::read_u16(&rec[14..]) == NO_FIELD {
                None
            } else {
                Some(read_subfield(rec, 14))
            };
            let n_slaves = NativeEndian::read_u16(&rec[20..]) as usize;
            let slaves = (0..n_slaves)
                .map(|i| NativeEndian::read_u16(&rec[22 + 2 * i..]))
                .collect();
            Ofpact::Bundle {
                algorithm: NativeEndian::read_u16(&rec[8..]),
                hash_fields: NativeEndian::read_u16(&rec[10..]),
                basis: NativeEndian::read_u16(&rec[12..]),
                dst,
                slaves,
            }
        }
        OfpactType::SetVlanVid => Ofpact::SetVlanVid(NativeEndian::read_u16(&rec[8..])),
        OfpactType::SetVlanPcp => Ofpact::SetVlanPcp(rec[8]),
        OfpactType::StripVlan => Ofpact::StripVlan,
        OfpactType::SetEthSrc => {
            let mut mac = [0; 6];
            mac.copy_from_slice(&rec[8..14]);
            Ofpact::SetEthSrc(mac)
        }
        OfpactType::SetEthDst => {
            let mut mac = [0; 6];
            mac.copy_from_slice(&rec[8..14]);
            Ofpact::SetEthDst(mac)
        }
        OfpactType::SetIpv4Src => Ofpact::SetIpv4Src(NativeEndian::read_u32(&rec[8..])),
        OfpactType::SetIpv4Dst => Ofpact::SetIpv4Dst(NativeEndian::read_u32(&rec[8..])),
        OfpactType::SetIpv4Dscp => Ofpact::SetIpv4Dscp(rec[8]),
        OfpactType::SetL4SrcPort => Ofpact::SetL4SrcPort(NativeEndian::read_u16(&rec[8..])),
        OfpactType::SetL4DstPort => Ofpact::SetL4DstPort(NativeEndian::read_u16(&rec[8..])),
        OfpactType::SetTunnel => Ofpact::SetTunnel(NativeEndian::read_u64(&rec[8..])),
        OfpactType::SetQueue => Ofpact::SetQueue(NativeEndian::read_u32(&rec[8..])),
        OfpactType::PopQueue => Ofpact::PopQueue,
        OfpactType::RegMove => Ofpact::RegMove {
            src: read_subfield(rec, 8),
            dst: read_subfield(rec, 14),
        },
        OfpactType::RegLoad => Ofpact::RegLoad {
            dst: read_subfield(rec, 8),
            value: NativeEndian::read_u64(&rec[14..]),
        },
        OfpactType::DecTtl => Ofpact::DecTtl,
        OfpactType::FinTimeout => Ofpact::FinTimeout {
            idle_timeout: NativeEndian::read_u16(&rec[8..]),
            hard_timeout: NativeEndian::read_u16(&rec[10..]),
        },
        OfpactType::Resubmit => Ofpact::Resubmit {
            in_port: NativeEndian::read_u16(&rec[8..]),
            table_id: rec[10],
        },
        OfpactType::Learn => {
            let spec_len = NativeEndian::read_u16(&rec[26..]) as usize;
            Ofpact::Learn {
                idle_timeout: NativeEndian::read_u16(&rec[8..]),
                hard_timeout: NativeEndian::read_u16(&rec[10..]),
                priority: NativeEndian::read_u16(&rec[12..]),
                flags: NativeEndian::read_u16(&rec[14..]),
                cookie: NativeEndian::read_u64(&rec[16..]),
                table_id: rec[24],
                specs: &rec[28..28 + spec_len],
            }
        }
        OfpactType::Multipath => Ofpact::Multipath {
            hash_fields: NativeEndian::read_u16(&rec[8..]),
            basis: NativeEndian::read_u16(&rec[10..]),
            algorithm: NativeEndian::read_u16(&rec[12..]),
            max_link: NativeEndian::read_u16(&rec[14..]),
            arg: NativeEndian::read_u32(&rec[16..]),
            dst: read_subfield(rec, 20),
        },
        OfpactType::Autopath => Ofpact::Autopath {
            dst: read_subfield(rec, 8),
            port: NativeEndian::read_u32(&rec[14..]),
        },
        OfpactType::Note => {
            let data_len = NativeEndian::read_u16(&rec[8..]) as usize;
            Ofpact::Note(&rec[10..10 + data_len])
        }
        OfpactType::Exit => Ofpact::Exit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta_flow::MfField;

    #[test]
    fn empty_stream() {
        let mut acts = Ofpacts::new();
        assert!(acts.is_empty());
        acts.terminate();
        assert!(acts.is_empty());
        assert_eq!(8, acts.as_bytes().len());
    }

    #[test]
    fn records_are_aligned() {
        let mut acts = Ofpacts::new();
        acts.push(Compat::None, &Ofpact::SetVlanPcp(3));
        acts.push(Compat::None, &Ofpact::Note(&[1, 2, 3]));
        acts.push(Compat::None, &Ofpact::Output {
            port: 1,
            max_len: 0,
        });
        acts.terminate();

        let mut ofs = 0;
        let buf = acts.as_bytes();
        let mut starts = vec![];
        loop {
            starts.push(ofs);
            let len = NativeEndian::read_u16(&buf[ofs + 4..]) as usize;
            if NativeEndian::read_u16(&buf[ofs..]) == OfpactType::End as u16 {
                break;
            }
            ofs += (len + OFPACT_ALIGN - 1) / OFPACT_ALIGN * OFPACT_ALIGN;
        }
        for start in starts {
            assert_eq!(0, start % OFPACT_ALIGN);
        }
    }

    #[test]
    fn push_parse_round_trip() {
        let specs = [0x20, 0x10, 0, 1, 0x06, 0x04, 0, 0, 0, 0];
        let all = [
            Ofpact::Output { port: 3, max_len: 128 },
            Ofpact::Controller { max_len: 64, controller_id: 2, reason: 1 },
            Ofpact::Enqueue { port: 5, queue: 9 },
            Ofpact::OutputReg {
                src: SubField::new(MfField::Reg0, 0, 16),
                max_len: 100,
            },
            Ofpact::Bundle {
                algorithm: 1,
                hash_fields: 0,
                basis: 50,
                dst: Some(SubField::new(MfField::Reg1, 0, 16)),
                slaves: vec![1, 2, 3],
            },
            Ofpact::SetVlanVid(0xfff),
            Ofpact::SetVlanPcp(7),
            Ofpact::StripVlan,
            Ofpact::SetEthSrc([1, 2, 3, 4, 5, 6]),
            Ofpact::SetEthDst([6, 5, 4, 3, 2, 1]),
            Ofpact::SetIpv4Src(0xc0a80001),
            Ofpact::SetIpv4Dst(0xc0a80002),
            Ofpact::SetIpv4Dscp(0x40),
            Ofpact::SetL4SrcPort(80),
            Ofpact::SetL4DstPort(443),
            Ofpact::SetTunnel(0x1234_5678_9abc),
            Ofpact::SetQueue(7),
            Ofpact::PopQueue,
            Ofpact::RegMove {
                src: SubField::new(MfField::InPort, 0, 16),
                dst: SubField::new(MfField::Reg2, 0, 16),
            },
            Ofpact::RegLoad {
                dst: SubField::new(MfField::Reg3, 4, 8),
                value: 0xab,
            },
            Ofpact::DecTtl,
            Ofpact::FinTimeout { idle_timeout: 10, hard_timeout: 20 },
            Ofpact::Resubmit { in_port: 2, table_id: 0xff },
            Ofpact::Learn {
                idle_timeout: 5,
                hard_timeout: 10,
                priority: 80,
                flags: 0,
                cookie: 0xdead_beef,
                table_id: 1,
                specs: &specs,
            },
            Ofpact::Multipath {
                hash_fields: 1,
                basis: 50,
                algorithm: 2,
                max_link: 15,
                arg: 0,
                dst: SubField::new(MfField::Reg0, 0, 4),
            },
            Ofpact::Autopath {
                dst: SubField::new(MfField::Reg1, 0, 16),
                port: 6,
            },
            Ofpact::Note(&[0xde, 0xad]),
            Ofpact::Exit,
        ];

        let mut acts = Ofpacts::new();
        for act in &all {
            acts.push(Compat::None, act);
        }
        acts.terminate();

        let parsed: Vec<_> = acts.iter().map(|rec| rec.action).collect();
        assert_eq!(all.len(), parsed.len());
        for (orig, parsed) in all.iter().zip(parsed.iter()) {
            assert_eq!(orig, parsed);
        }
    }

    #[test]
    fn compat_survives() {
        let mut acts = Ofpacts::new();
        acts.push(Compat::SetTunnel64, &Ofpact::SetTunnel(1));
        acts.terminate();
        let rec = acts.iter().next().unwrap();
        assert_eq!(Compat::SetTunnel64, rec.compat);
    }

    #[test]
    fn byte_equality() {
        let mut a = Ofpacts::new();
        let mut b = Ofpacts::new();
        for acts in [&mut a, &mut b].iter_mut() {
            acts.push(Compat::None, &Ofpact::Output { port: 1, max_len: 0 });
            acts.terminate();
        }
        assert!(a.equal(&b));
        let mut c = Ofpacts::new();
        c.push(Compat::None, &Ofpact::Output { port: 2, max_len: 0 });
        c.terminate();
        assert!(!a.equal(&c));
    }

    #[test]
    fn outputs_to_port() {
        let mut acts = Ofpacts::new();
        acts.push(Compat::None, &Ofpact::Output { port: 4, max_len: 0 });
        acts.push(Compat::None, &Ofpact::Enqueue { port: 7, queue: 1 });
        acts.push(Compat::None, &Ofpact::Controller {
            max_len: 0,
            controller_id: 0,
            reason: 1,
        });
        acts.terminate();
        assert!(acts.outputs_to_port(4));
        assert!(acts.outputs_to_port(7));
        assert!(acts.outputs_to_port(OFPP_CONTROLLER));
        assert!(!acts.outputs_to_port(5));
    }
}
