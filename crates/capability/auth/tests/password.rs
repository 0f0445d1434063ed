use locus_auth::{hash_password, verify_password};

#[test]
fn argon2_hash_verifies() {
    let hash = hash_password("secret").expect("hash");
    assert!(hash.starts_with("$argon2"));

    let check = verify_password(&hash, "secret").expect("verify");
    assert!(check.verified);
    assert!(check.upgrade_hash.is_none());

    let check = verify_password(&hash, "wrong").expect("verify");
    assert!(!check.verified);
}

#[test]
fn plaintext_fallback_matches_and_offers_upgrade() {
    let check = verify_password("secret", "secret").expect("verify");
    assert!(check.verified);
    let upgrade = check.upgrade_hash.expect("upgrade hash");
    assert!(upgrade.starts_with("$argon2"));

    // 升级哈希可直接用于后续校验
    let check = verify_password(&upgrade, "secret").expect("verify");
    assert!(check.verified);
}

#[test]
fn plaintext_fallback_rejects_mismatch() {
    let check = verify_password("secret", "wrong").expect("verify");
    assert!(!check.verified);
    assert!(check.upgrade_hash.is_none());
}
