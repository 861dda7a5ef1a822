//! Prefix arithmetic shared by both address families.
//!
//! This module contains:
//! - [`mask`] - prefix masks, network/broadcast addresses, the netmask table
//! - [`range`] - inclusive address ranges and their CIDR decomposition

pub mod mask;
pub mod range;

pub use mask::{
    broadcast_addr, cut_addr, get_cidr_mask, get_cidr_mask_v6, ip_after_subnet, lo_mask,
    netmask_for_prefix, prefix_for_netmask, MAX_LENGTH, MAX_LENGTH_V6,
};
pub use range::AddressRange;
