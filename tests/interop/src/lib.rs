//! Integration tests for openHiTLS-rs.
//! Cross-crate SM9 flows: keys and ciphertexts travel as DER between a key
//! generation center and its users.

#[cfg(test)]
mod tests {
    use hitls_crypto::sm9::{
        EncryptMasterPrivateKey, EncryptMasterPublicKey, EncryptPrivateKey, EncrypterOpts,
        KeyExchange, KeyPackage, SignMasterPrivateKey, SignMasterPublicKey, SignPrivateKey,
        Sm9Signature,
    };
    use hitls_types::algorithm::{sm9_hid, Sm9EncType, SymCipherId};
    use hitls_types::CryptoError;
    use hitls_utils::asn1::{tags, Decoder};
    use rand_core::OsRng;

    // -------------------------------------------------------
    // 1. Sign with keys shipped as DER
    // -------------------------------------------------------
    #[test]
    fn test_sign_with_der_transported_keys() {
        let kgc = SignMasterPrivateKey::generate(&mut OsRng).unwrap();
        let kgc_der = kgc.to_der();
        let pub_der = kgc.public_key().to_der();
        let user_der = kgc
            .generate_user_key(b"alice@example.com", sm9_hid::SIGN)
            .unwrap()
            .to_der_with_master()
            .unwrap();

        // The KGC restores from its own backup.
        let restored = SignMasterPrivateKey::from_der(&kgc_der).unwrap();
        assert!(restored == kgc);

        let alice = SignPrivateKey::from_der(&user_der).unwrap();
        let sig_der = alice.sign_der(&mut OsRng, b"payload digest").unwrap();

        let verifier = SignMasterPublicKey::from_der(&pub_der).unwrap();
        assert!(verifier.verify_der(b"alice@example.com", sm9_hid::SIGN, b"payload digest", &sig_der));
        assert!(!verifier.verify_der(b"bob@example.com", sm9_hid::SIGN, b"payload digest", &sig_der));

        // Signature DER is SEQUENCE { OCTET STRING, BIT STRING }.
        let mut outer = Decoder::new(&sig_der);
        let mut seq = outer.read_sequence().unwrap();
        assert_eq!(seq.read_octet_string().unwrap().len(), 32);
        let s = seq.read_bit_string().unwrap();
        assert_eq!((s.len(), s[0]), (65, 0x04));
        assert!(seq.finish().is_ok());
        let sig = Sm9Signature::from_der(&sig_der).unwrap();
        assert_eq!(sig.s().as_slice(), s);
    }

    // -------------------------------------------------------
    // 2. Bare user key needs the master public key attached
    // -------------------------------------------------------
    #[test]
    fn test_bare_user_key_requires_master() {
        let kgc = SignMasterPrivateKey::generate(&mut OsRng).unwrap();
        let bare_der = kgc
            .generate_user_key(b"alice", sm9_hid::SIGN)
            .unwrap()
            .to_der();
        assert_eq!(bare_der[0], tags::BIT_STRING);

        let mut alice = SignPrivateKey::from_der(&bare_der).unwrap();
        assert!(alice.master_public_key().is_none());
        assert_eq!(
            alice.sign(&mut OsRng, b"m").unwrap_err(),
            CryptoError::InvalidKey
        );

        alice.set_master_public_key(kgc.public_key().clone());
        let sig = alice.sign(&mut OsRng, b"m").unwrap();
        assert!(kgc.public_key().verify(b"alice", sm9_hid::SIGN, b"m", &sig));
    }

    // -------------------------------------------------------
    // 3. DER encryption carries encType
    // -------------------------------------------------------
    #[test]
    fn test_encrypt_der_structure_and_decrypt() {
        let kgc = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let pub_der = kgc.public_key().to_der();
        let bob_der = kgc
            .generate_user_key(b"bob", sm9_hid::ENCRYPT)
            .unwrap()
            .to_der();

        let sender = EncryptMasterPublicKey::from_der(&pub_der).unwrap();
        let opts = EncrypterOpts::Cbc(SymCipherId::Aes128);
        let ct = sender
            .encrypt_der(&mut OsRng, b"bob", sm9_hid::ENCRYPT, b"attack at dawn", &opts)
            .unwrap();

        let mut outer = Decoder::new(&ct);
        let mut seq = outer.read_sequence().unwrap();
        assert_eq!(seq.read_u64().unwrap(), u64::from(Sm9EncType::Cbc.as_u8()));
        assert_eq!(seq.read_bit_string().unwrap().len(), 65);
        assert_eq!(seq.read_octet_string().unwrap().len(), 32);
        // IV block plus one padded block.
        assert_eq!(seq.read_octet_string().unwrap().len(), 32);

        // Decryption needs no master public key.
        let bob = EncryptPrivateKey::from_der(&bob_der).unwrap();
        assert_eq!(bob.decrypt(b"bob", &ct, &opts).unwrap(), b"attack at dawn");
    }

    // -------------------------------------------------------
    // 4. Key package round trip
    // -------------------------------------------------------
    #[test]
    fn test_key_package_unwrap() {
        let kgc = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let bob = kgc.generate_user_key(b"bob", sm9_hid::ENCRYPT).unwrap();
        let der = kgc
            .public_key()
            .wrap_key_der(&mut OsRng, b"bob", sm9_hid::ENCRYPT, 32)
            .unwrap();
        let package = KeyPackage::from_der(&der).unwrap();
        let key = bob.unwrap_key(b"bob", &package.cipher(), 32).unwrap();
        assert_eq!(key, package.key());
    }

    // -------------------------------------------------------
    // 5. Key exchange between DER-restored parties
    // -------------------------------------------------------
    #[test]
    fn test_key_exchange_with_restored_keys() {
        let kgc = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let alice_der = kgc
            .generate_user_key(b"alice", sm9_hid::EXCHANGE)
            .unwrap()
            .to_der_with_master()
            .unwrap();
        let bob_der = kgc
            .generate_user_key(b"bob", sm9_hid::EXCHANGE)
            .unwrap()
            .to_der_with_master()
            .unwrap();
        let alice = EncryptPrivateKey::from_der(&alice_der).unwrap();
        let bob = EncryptPrivateKey::from_der(&bob_der).unwrap();

        let mut initiator = KeyExchange::new(&alice, b"alice", b"bob", 32, true).unwrap();
        let mut responder = KeyExchange::new(&bob, b"bob", b"alice", 32, true).unwrap();

        let r_a = initiator.init(&mut OsRng, sm9_hid::EXCHANGE).unwrap();
        let (r_b, s_b) = responder.respond(&mut OsRng, sm9_hid::EXCHANGE, &r_a).unwrap();
        let (key_a, s_a) = initiator
            .confirm_responder(&r_b, s_b.as_ref().map(|s| s.as_slice()))
            .unwrap();
        let key_b = responder
            .confirm_initiator(s_a.as_ref().map(|s| s.as_slice()))
            .unwrap();
        assert_eq!(key_a, key_b);

        initiator.destroy();
        responder.destroy();
    }

    // -------------------------------------------------------
    // 6. Keys from one scheme do not verify under another KGC
    // -------------------------------------------------------
    #[test]
    fn test_foreign_kgc_rejects() {
        let kgc_a = SignMasterPrivateKey::generate(&mut OsRng).unwrap();
        let kgc_b = SignMasterPrivateKey::generate(&mut OsRng).unwrap();
        let alice = kgc_a.generate_user_key(b"alice", sm9_hid::SIGN).unwrap();
        let sig = alice.sign(&mut OsRng, b"m").unwrap();
        assert!(kgc_a.public_key().verify(b"alice", sm9_hid::SIGN, b"m", &sig));
        assert!(!kgc_b.public_key().verify(b"alice", sm9_hid::SIGN, b"m", &sig));

        let enc_a = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let enc_b = EncryptMasterPrivateKey::generate(&mut OsRng).unwrap();
        let bob_b = enc_b.generate_user_key(b"bob", sm9_hid::ENCRYPT).unwrap();
        let ct = enc_a
            .public_key()
            .encrypt(&mut OsRng, b"bob", sm9_hid::ENCRYPT, b"secret", &EncrypterOpts::Xor)
            .unwrap();
        assert_eq!(
            bob_b.decrypt(b"bob", &ct, &EncrypterOpts::Xor).unwrap_err(),
            CryptoError::Sm9Decryption
        );
    }
}
