#![forbid(unsafe_code)]
#![doc = "Utility functions for openHiTLS: ASN.1 DER encoding."]

#[cfg(feature = "asn1")]
pub mod asn1;
