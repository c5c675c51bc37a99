/*!
The flow context that the semantic validator checks actions against.

Only the fields that carry match prerequisites for the sub-field module
are interpreted; everything else is along for the ride so a caller can
reuse one flow value across lookup and validation.
*/

/// A flow as extracted from a packet or a flow-table match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flow {
    /// Ingress port
    pub in_port: u16,
    /// Ethernet source address
    pub dl_src: [u8; 6],
    /// Ethernet destination address
    pub dl_dst: [u8; 6],
    /// Ethernet frame type
    pub dl_type: u16,
    /// VLAN tag control information
    pub vlan_tci: u16,
    /// IPv4 source address
    pub nw_src: u32,
    /// IPv4 destination address
    pub nw_dst: u32,
    /// IP protocol
    pub nw_proto: u8,
    /// L4 source port
    pub tp_src: u16,
    /// L4 destination port
    pub tp_dst: u16,
    /// Tunnel id the packet arrived with
    pub tun_id: u64,
    /// Per-flow scratch registers
    pub regs: [u32; 4],
}

/// The Ethernet frame type of IPv4.
pub const ETH_TYPE_IP: u16 = 0x0800;
