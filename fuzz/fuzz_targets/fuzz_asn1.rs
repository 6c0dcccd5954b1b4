#![no_main]
use hitls_utils::asn1::Decoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = Decoder::new(data);
    while !decoder.is_empty() {
        match decoder.peek_tag() {
            Ok(_) => {
                if let Ok(mut inner) = decoder.read_sequence() {
                    while inner.read_tlv().is_ok() {}
                } else if decoder.read_tlv().is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    }
});
