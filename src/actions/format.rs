/*!
The canonical text rendering of an action stream.

The output is `actions=` followed by `drop` for an empty stream or a
comma-separated list of per-record forms. The rendering is stable (the
same record always produces the same text) but not meant to be parsed
back; the flow-syntax parser lives with the CLI tooling.
*/

use crate::meta_flow;
use crate::ports::{self, OFPP_CONTROLLER, OFPP_MAX};

use super::wire::OFPR_ACTION;
use super::{autopath, bundle, learn, multipath, reg};
use super::{Compat, Ofpact, Ofpacts, Record};

/// Appends the rendering of `acts` to `s`.
pub fn format(acts: &Ofpacts, s: &mut String) {
    s.push_str("actions=");
    if acts.is_empty() {
        s.push_str("drop");
        return;
    }
    let mut first = true;
    for rec in acts.iter() {
        if !first {
            s.push(',');
        }
        first = false;
        format_action(&rec, s);
    }
}

/// Drops a trailing `c` if present; used after optional comma-separated
/// groups.
fn chomp(s: &mut String, c: char) {
    if s.ends_with(c) {
        s.pop();
    }
}

fn packet_in_reason(reason: u8, s: &mut String) {
    match reason {
        0 => s.push_str("no_match"),
        1 => s.push_str("action"),
        2 => s.push_str("invalid_ttl"),
        n => s.push_str(&n.to_string()),
    }
}

fn format_mac(mac: &[u8; 6], s: &mut String) {
    s.push_str(&format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    ));
}

fn format_ip(ip: u32, s: &mut String) {
    let octets = ip.to_be_bytes();
    s.push_str(&format!(
        "{}.{}.{}.{}",
        octets[0], octets[1], octets[2], octets[3]
    ));
}

fn format_action(rec: &Record, s: &mut String) {
    match rec.action {
        Ofpact::Output { port, max_len } => {
            if port < OFPP_MAX {
                s.push_str(&format!("output:{}", port));
            } else {
                ports::format_port(port, s);
                if port == OFPP_CONTROLLER {
                    s.push_str(&format!(":{}", max_len));
                }
            }
        }
        Ofpact::Controller {
            max_len,
            controller_id,
            reason,
        } => {
            if reason == OFPR_ACTION && controller_id == 0 {
                s.push_str(&format!("CONTROLLER:{}", max_len));
            } else {
                s.push_str("controller(");
                if reason != OFPR_ACTION {
                    s.push_str("reason=");
                    packet_in_reason(reason, s);
                    s.push(',');
                }
                if max_len != u16::max_value() {
                    s.push_str(&format!("max_len={},", max_len));
                }
                if controller_id != 0 {
                    s.push_str(&format!("id={},", controller_id));
                }
                chomp(s, ',');
                s.push(')');
            }
        }
        Ofpact::Enqueue { port, queue } => {
            s.push_str("enqueue:");
            ports::format_port(port, s);
            s.push_str(&format!("q{}", queue));
        }
        Ofpact::OutputReg { ref src, .. } => {
            s.push_str("output:");
            meta_flow::format_subfield(src, s);
        }
        Ofpact::Bundle {
            algorithm,
            hash_fields,
            basis,
            ref dst,
            ref slaves,
        } => bundle::format(algorithm, hash_fields, basis, dst.as_ref(), slaves, s),
        Ofpact::SetVlanVid(vid) => s.push_str(&format!("mod_vlan_vid:{}", vid)),
        Ofpact::SetVlanPcp(pcp) => s.push_str(&format!("mod_vlan_pcp:{}", pcp)),
        Ofpact::StripVlan => s.push_str("strip_vlan"),
        Ofpact::SetEthSrc(ref mac) => {
            s.push_str("mod_dl_src:");
            format_mac(mac, s);
        }
        Ofpact::SetEthDst(ref mac) => {
            s.push_str("mod_dl_dst:");
            format_mac(mac, s);
        }
        Ofpact::SetIpv4Src(ip) => {
            s.push_str("mod_nw_src:");
            format_ip(ip, s);
        }
        Ofpact::SetIpv4Dst(ip) => {
            s.push_str("mod_nw_dst:");
            format_ip(ip, s);
        }
        Ofpact::SetIpv4Dscp(dscp) => s.push_str(&format!("mod_nw_tos:{}", dscp)),
        Ofpact::SetL4SrcPort(port) => s.push_str(&format!("mod_tp_src:{}", port)),
        Ofpact::SetL4DstPort(port) => s.push_str(&format!("mod_tp_dst:{}", port)),
        Ofpact::RegMove { ref src, ref dst } => reg::move_format(src, dst, s),
        Ofpact::RegLoad { ref dst, value } => reg::load_format(dst, value, s),
        Ofpact::DecTtl => s.push_str("dec_ttl"),
        Ofpact::SetTunnel(tun_id) => {
            let wide =
                tun_id > u64::from(u32::max_value()) || rec.compat == Compat::SetTunnel64;
            s.push_str(&format!(
                "set_tunnel{}:{:#x}",
                if wide { "64" } else { "" },
                tun_id
            ));
        }
        Ofpact::SetQueue(queue_id) => s.push_str(&format!("set_queue:{}", queue_id)),
        Ofpact::PopQueue => s.push_str("pop_queue"),
        Ofpact::FinTimeout {
            idle_timeout,
            hard_timeout,
        } => {
            s.push_str("fin_timeout(");
            if idle_timeout != 0 {
                s.push_str(&format!("idle_timeout={},", idle_timeout));
            }
            if hard_timeout != 0 {
                s.push_str(&format!("hard_timeout={},", hard_timeout));
            }
            chomp(s, ',');
            s.push(')');
        }
        Ofpact::Resubmit { in_port, table_id } => {
            if in_port != ports::OFPP_IN_PORT && table_id == 0xff {
                s.push_str(&format!("resubmit:{}", in_port));
            } else {
                s.push_str("resubmit(");
                if in_port != ports::OFPP_IN_PORT {
                    ports::format_port(in_port, s);
                }
                s.push(',');
                if table_id != 0xff {
                    s.push_str(&table_id.to_string());
                }
                s.push(')');
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
        } => learn::format(
            idle_timeout,
            hard_timeout,
            priority,
            flags,
            cookie,
            table_id,
            specs,
            s,
        ),
        Ofpact::Multipath {
            hash_fields,
            basis,
            algorithm,
            max_link,
            arg,
            ref dst,
        } => multipath::format(hash_fields, basis, algorithm, max_link, arg, dst, s),
        Ofpact::Autopath { ref dst, port } => autopath::format(dst, port, s),
        Ofpact::Note(data) => {
            s.push_str("note:");
            for (i, b) in data.iter().enumerate() {
                if i > 0 {
                    s.push('.');
                }
                s.push_str(&format!("{:02x}", b));
            }
        }
        Ofpact::Exit => s.push_str("exit"),
    }
}
