#![no_main]
use libfuzzer_sys::fuzz_target;
use std::{net::Ipv6Addr, str::FromStr};
use uri_utility::{component::Host, IriRef};

fuzz_target!(|data: &str| {
    assert_eq!(parse_v6(data), Ipv6Addr::from_str(data).ok());
});

fn parse_v6(s: &str) -> Option<Ipv6Addr> {
    let s = format!("//[{s}]");
    match IriRef::parse(&*s).ok()?.authority()?.host_parsed() {
        Host::Ipv6 { addr, zone_id } => zone_id.is_none().then_some(addr),
        _ => None,
    }
}
