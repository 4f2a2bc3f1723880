//! Primary-address normalization.

use std::net::IpAddr;

use crate::error::DeriveError;

/// Resolve a primary-address value to a bare IP string.
///
/// NetBox stores primary addresses in CIDR form (`10.0.0.5/24`); a bare
/// address is accepted too. The prefix length, when present, must fit the
/// address family.
pub fn normalize_address(raw: &str) -> Result<String, DeriveError> {
    let (host, prefix) = match raw.split_once('/') {
        Some((host, prefix)) => (host, Some(prefix)),
        None => (raw, None),
    };

    let ip: IpAddr = host
        .trim()
        .parse()
        .map_err(|_| DeriveError::BadAddress(raw.to_string()))?;

    if let Some(prefix) = prefix {
        let max_bits: u8 = if ip.is_ipv4() { 32 } else { 128 };
        match prefix.parse::<u8>() {
            Ok(bits) if bits <= max_bits => {}
            _ => return Err(DeriveError::BadAddress(raw.to_string())),
        }
    }

    Ok(ip.to_string())
}
