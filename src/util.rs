use std::net::IpAddr;
use url::{Host, Url};

/// Endpoint schemes whose host part is an IP address worth reporting.
const ADDR_SCHEMES: &[&str] = &["ipp", "ipps", "lpd", "socket", "http", "https"];

/// Inserts `item` into a sorted vector. Returns `false` if it was already there.
pub fn sorted_insert<T: Ord>(items: &mut Vec<T>, item: T) -> bool {
	match items.binary_search(&item) {
		Ok(_) => false,
		Err(at) => {
			items.insert(at, item);
			true
		}
	}
}

/// Removes `item` from a sorted vector. Returns `false` if it wasn't there.
pub fn sorted_remove<T: Ord>(items: &mut Vec<T>, item: &T) -> bool {
	match items.binary_search(item) {
		Ok(at) => {
			items.remove(at);
			true
		}
		Err(_) => false,
	}
}

#[inline(always)]
pub fn sorted_contains<T: Ord>(items: &[T], item: &T) -> bool {
	items.binary_search(item).is_ok()
}

/// Merges two sorted, duplicate-free slices into one sorted, duplicate-free vector.
pub fn sorted_merge<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
	let mut out = Vec::with_capacity(a.len() + b.len());
	let (mut a, mut b) = (a, b);

	while let (Some(x), Some(y)) = (a.first(), b.first()) {
		match x.cmp(y) {
			std::cmp::Ordering::Less => {
				out.push(x.clone());
				a = &a[1..];
			}
			std::cmp::Ordering::Greater => {
				out.push(y.clone());
				b = &b[1..];
			}
			std::cmp::Ordering::Equal => {
				out.push(x.clone());
				a = &a[1..];
				b = &b[1..];
			}
		}
	}

	out.extend_from_slice(a);
	out.extend_from_slice(b);
	out
}

/// Extracts the IP addresses endpoints point at, sorted and de-duplicated.
///
/// Endpoints that fail to parse, use an unrelated scheme or name a host by DNS name are skipped.
pub fn addrs_from_endpoints(endpoints: &[String]) -> Vec<IpAddr> {
	let mut addrs = Vec::new();

	for endpoint in endpoints {
		let url = match Url::parse(endpoint) {
			Ok(url) if ADDR_SCHEMES.contains(&url.scheme()) => url,
			_ => continue,
		};

		// ipp, lpd and socket are not special schemes, so their hosts come back opaque
		let addr = match url.host() {
			Some(Host::Ipv4(addr)) => IpAddr::V4(addr),
			Some(Host::Ipv6(addr)) => IpAddr::V6(addr),
			Some(Host::Domain(host)) => match host.parse::<IpAddr>() {
				Ok(addr) => addr,
				Err(_) => continue,
			},
			None => continue,
		};

		let addr = match addr {
			IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(addr),
			IpAddr::V4(_) => addr,
		};

		sorted_insert(&mut addrs, addr);
	}

	addrs
}
