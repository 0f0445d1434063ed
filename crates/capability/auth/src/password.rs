use crate::AuthError;
use argon2::{
    Argon2,
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
    password_hash::SaltString,
};
use rand_core::OsRng;
use subtle::ConstantTimeEq;

/// 口令校验结果。
pub struct PasswordCheck {
    pub verified: bool,
    /// 存储值为明文且匹配时给出的 argon2 替换哈希。
    pub upgrade_hash: Option<String>,
}

/// 生成 argon2 口令哈希（用于配置运维账号）。
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AuthError::Internal(err.to_string()))?;
    Ok(hash.to_string())
}

/// 校验口令。
///
/// 存储值以 `$argon2` 开头时按哈希校验；否则按明文做常量时间比较，
/// 匹配时附带新的 argon2 哈希供配置升级。
pub fn verify_password(stored: &str, password: &str) -> Result<PasswordCheck, AuthError> {
    if stored.starts_with("$argon2") {
        let parsed =
            PasswordHash::new(stored).map_err(|err| AuthError::Internal(err.to_string()))?;
        let verified = Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
        return Ok(PasswordCheck {
            verified,
            upgrade_hash: None,
        });
    }

    let verified: bool = stored.as_bytes().ct_eq(password.as_bytes()).into();
    if !verified {
        return Ok(PasswordCheck {
            verified: false,
            upgrade_hash: None,
        });
    }
    let upgrade_hash = hash_password(password)?;
    Ok(PasswordCheck {
        verified: true,
        upgrade_hash: Some(upgrade_hash),
    })
}
