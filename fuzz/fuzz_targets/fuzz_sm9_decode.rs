#![no_main]
use hitls_crypto::sm9::{
    EncryptMasterPublicKey, EncryptPrivateKey, G1Point, G2Point, Gt, KeyPackage,
    SignMasterPrivateKey, SignMasterPublicKey, SignPrivateKey, Sm9Signature,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(p) = G1Point::from_bytes(data) {
        assert!(p.is_on_curve());
    }
    if let Ok(q) = G2Point::from_bytes(data) {
        assert!(q.is_on_curve());
    }
    let _ = Gt::from_bytes(data);

    let _ = SignMasterPrivateKey::from_der(data);
    let _ = SignMasterPublicKey::from_der(data);
    let _ = SignPrivateKey::from_der(data);
    let _ = EncryptMasterPublicKey::from_der(data);
    let _ = EncryptPrivateKey::from_der(data);

    if let Ok(sig) = Sm9Signature::from_der(data) {
        assert_eq!(Sm9Signature::from_der(&sig.to_der()).ok(), Some(sig));
    }
    let _ = KeyPackage::from_der(data);
});
