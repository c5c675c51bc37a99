/*!
The learn sub-codec.

A learn action installs a new flow when a packet hits it. The new flow
is described by a list of flow-mod specs trailing the fixed wire struct:
each spec copies a source (an immediate value or a sub-field of the
current flow) into a destination (a match criterion, a sub-field load,
or an output action of the new flow).

The spec bytes are structurally validated here and then carried
verbatim in the internal record; validation against a flow context and
formatting re-walk them on demand.
*/

use byteorder::{ByteOrder, NetworkEndian};

use crate::error::{Error, Result};
use crate::flow::Flow;
use crate::meta_flow::{self, SubField};

use super::wire::{is_all_zeros, put_nx_header, put_u16, put_u32, put_u64, put_zeros, round_up};
use super::wire::{NXAST_LEARN, NX_ACTION_LEARN_LEN, OFP_ACTION_ALIGN};
use super::{Compat, Ofpact, Ofpacts};

const N_BITS_MASK: u16 = 0x3ff;
const SRC_IMMEDIATE: u16 = 1 << 13;
const DST_SHIFT: u16 = 11;
const DST_MASK: u16 = 3 << DST_SHIFT;

const DST_MATCH: u16 = 0;
const DST_LOAD: u16 = 1;
const DST_OUTPUT: u16 = 2;

/// Source half of one flow-mod spec.
pub(crate) enum SpecSrc<'a> {
    Immediate(&'a [u8]),
    Field(SubField),
}

/// Destination half of one flow-mod spec.
pub(crate) enum SpecDst {
    Match(SubField),
    Load(SubField),
    Output,
}

pub(crate) struct Spec<'a> {
    pub src: SpecSrc<'a>,
    pub dst: SpecDst,
}

/// Walks the flow-mod specs of a learn action. Iteration stops at the
/// first zero header; `residual` exposes whatever follows it.
pub(crate) struct SpecWalker<'a> {
    rest: &'a [u8],
}

impl<'a> SpecWalker<'a> {
    pub fn new(specs: &'a [u8]) -> SpecWalker<'a> {
        SpecWalker { rest: specs }
    }

    pub fn residual(&self) -> &'a [u8] {
        self.rest
    }

    fn fail(&mut self, error: Error) -> Option<Result<Spec<'a>>> {
        self.rest = &[];
        Some(Err(error))
    }
}

impl<'a> Iterator for SpecWalker<'a> {
    type Item = Result<Spec<'a>>;

    fn next(&mut self) -> Option<Result<Spec<'a>>> {
        let rest = self.rest;
        if rest.len() < 2 {
            return None;
        }
        let header = NetworkEndian::read_u16(rest);
        if header == 0 {
            return None;
        }
        let n_bits = header & N_BITS_MASK;
        if n_bits == 0 {
            return self.fail(Error::BadArgument);
        }
        let dst_type = (header & DST_MASK) >> DST_SHIFT;
        if dst_type != DST_MATCH && dst_type != DST_LOAD && dst_type != DST_OUTPUT {
            return self.fail(Error::BadArgument);
        }

        let mut p = &rest[2..];
        let src = if header & SRC_IMMEDIATE != 0 {
            let imm_len = (usize::from(n_bits) + 15) / 16 * 2;
            if p.len() < imm_len {
                return self.fail(Error::BadLen);
            }
            let imm = &p[..imm_len];
            p = &p[imm_len..];
            SpecSrc::Immediate(imm)
        } else {
            if p.len() < 6 {
                return self.fail(Error::BadLen);
            }
            let sf = match SubField::from_nxm(
                NetworkEndian::read_u32(p),
                NetworkEndian::read_u16(&p[4..]),
                n_bits,
            ) {
                Ok(sf) => sf,
                Err(e) => return self.fail(e),
            };
            p = &p[6..];
            SpecSrc::Field(sf)
        };

        let dst = if dst_type == DST_OUTPUT {
            SpecDst::Output
        } else {
            if p.len() < 6 {
                return self.fail(Error::BadLen);
            }
            let sf = match SubField::from_nxm(
                NetworkEndian::read_u32(p),
                NetworkEndian::read_u16(&p[4..]),
                n_bits,
            ) {
                Ok(sf) => sf,
                Err(e) => return self.fail(e),
            };
            p = &p[6..];
            match dst_type {
                DST_MATCH => SpecDst::Match(sf),
                _ => SpecDst::Load(sf),
            }
        };

        self.rest = p;
        Some(Ok(Spec { src, dst }))
    }
}

/// Decodes a learn action, structurally validating its specs.
pub fn from_wire(a: &[u8], out: &mut Ofpacts) -> Result<()> {
    let idle_timeout = NetworkEndian::read_u16(&a[10..]);
    let hard_timeout = NetworkEndian::read_u16(&a[12..]);
    let priority = NetworkEndian::read_u16(&a[14..]);
    let cookie = NetworkEndian::read_u64(&a[16..]);
    let flags = NetworkEndian::read_u16(&a[24..]);
    let table_id = a[26];

    let specs = &a[NX_ACTION_LEARN_LEN..];
    let mut walker = SpecWalker::new(specs);
    while let Some(spec) = walker.next() {
        let spec = spec?;
        if let SpecSrc::Field(ref sf) = spec.src {
            meta_flow::check_src(sf, None)?;
        }
        match spec.dst {
            SpecDst::Match(ref sf) => meta_flow::check_src(sf, None)?,
            SpecDst::Load(ref sf) => meta_flow::check_dst(sf, None)?,
            SpecDst::Output => {}
        }
    }
    // everything past the last spec is padding
    if !is_all_zeros(walker.residual()) {
        return Err(Error::BadArgument);
    }

    out.push(
        Compat::None,
        &Ofpact::Learn {
            idle_timeout,
            hard_timeout,
            priority,
            flags,
            cookie,
            table_id,
            specs,
        },
    );
    Ok(())
}

/// Encodes a learn action, padding the spec bytes to the action
/// alignment.
pub fn to_wire(
    idle_timeout: u16,
    hard_timeout: u16,
    priority: u16,
    flags: u16,
    cookie: u64,
    table_id: u8,
    specs: &[u8],
    out: &mut Vec<u8>,
) {
    let len = round_up(NX_ACTION_LEARN_LEN + specs.len(), OFP_ACTION_ALIGN);
    put_nx_header(out, NXAST_LEARN, len);
    put_u16::<NetworkEndian>(out, idle_timeout);
    put_u16::<NetworkEndian>(out, hard_timeout);
    put_u16::<NetworkEndian>(out, priority);
    put_u64::<NetworkEndian>(out, cookie);
    put_u16::<NetworkEndian>(out, flags);
    out.push(table_id);
    put_zeros(out, 5);
    out.extend_from_slice(specs);
    put_zeros(out, len - NX_ACTION_LEARN_LEN - specs.len());
}

/// Validates the specs against a flow context.
pub fn check(specs: &[u8], flow: &Flow) -> Result<()> {
    for spec in SpecWalker::new(specs) {
        let spec = spec?;
        if let SpecSrc::Field(ref sf) = spec.src {
            meta_flow::check_src(sf, Some(flow))?;
        }
        match spec.dst {
            SpecDst::Match(ref sf) => meta_flow::check_src(sf, Some(flow))?,
            SpecDst::Load(ref sf) => meta_flow::check_dst(sf, Some(flow))?,
            SpecDst::Output => {}
        }
    }
    Ok(())
}

fn format_src(src: &SpecSrc, s: &mut String) {
    match *src {
        SpecSrc::Immediate(bytes) => {
            s.push_str("0x");
            let mut significant = bytes.iter().skip_while(|&&b| b == 0).peekable();
            if significant.peek().is_none() {
                s.push('0');
            } else {
                for b in significant {
                    s.push_str(&format!("{:02x}", b));
                }
            }
        }
        SpecSrc::Field(ref sf) => meta_flow::format_subfield(sf, s),
    }
}

/// Appends the `learn(...)` rendering.
pub fn format(
    idle_timeout: u16,
    hard_timeout: u16,
    priority: u16,
    flags: u16,
    cookie: u64,
    table_id: u8,
    specs: &[u8],
    s: &mut String,
) {
    s.push_str(&format!("learn(table={}", table_id));
    if idle_timeout != 0 {
        s.push_str(&format!(",idle_timeout={}", idle_timeout));
    }
    if hard_timeout != 0 {
        s.push_str(&format!(",hard_timeout={}", hard_timeout));
    }
    if priority != 0 {
        s.push_str(&format!(",priority={}", priority));
    }
    if flags != 0 {
        s.push_str(&format!(",flags={:#x}", flags));
    }
    if cookie != 0 {
        s.push_str(&format!(",cookie={:#x}", cookie));
    }
    for spec in SpecWalker::new(specs) {
        let spec = match spec {
            Ok(spec) => spec,
            Err(_) => break,
        };
        s.push(',');
        match spec.dst {
            SpecDst::Match(ref dst) => {
                let same = match spec.src {
                    SpecSrc::Field(ref src) => src == dst,
                    SpecSrc::Immediate(_) => false,
                };
                meta_flow::format_subfield(dst, s);
                if !same {
                    s.push('=');
                    format_src(&spec.src, s);
                }
            }
            SpecDst::Load(ref dst) => {
                s.push_str("load:");
                format_src(&spec.src, s);
                s.push_str("->");
                meta_flow::format_subfield(dst, s);
            }
            SpecDst::Output => {
                s.push_str("output:");
                format_src(&spec.src, s);
            }
        }
    }
    s.push(')');
}
