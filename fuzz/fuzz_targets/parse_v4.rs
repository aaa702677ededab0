#![no_main]
use libfuzzer_sys::fuzz_target;
use std::{net::Ipv4Addr, str::FromStr};
use uri_utility::{component::Host, IriRef};

fuzz_target!(|data: &str| {
    assert_eq!(parse_v4(data), Ipv4Addr::from_str(data).ok());
});

fn parse_v4(s: &str) -> Option<Ipv4Addr> {
    let s = format!("//{s}");
    match IriRef::parse(&*s).ok()?.authority()?.host_parsed() {
        Host::Ipv4(addr) => Some(addr),
        _ => None,
    }
}
