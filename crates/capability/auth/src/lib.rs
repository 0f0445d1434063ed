//! 认证能力：运维账号登录、JWT 生成与校验。
//!
//! 系统只有一个配置注入的运维账号（用户名 + argon2 口令哈希），
//! 登录成功后签发 bearer access token；查询接口凭 token 访问。

mod jwt;
mod password;

use tracing::warn;

pub use jwt::JwtManager;
pub use password::{PasswordCheck, hash_password, verify_password};

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("internal error: {0}")]
    Internal(String),
}

/// 登录返回的 token 结构。
pub struct AuthTokens {
    pub access_token: String,
    /// access token 有效期（秒）。
    pub expires_in: u64,
}

/// 运维账号凭据（来自配置）。
#[derive(Debug, Clone)]
pub struct OperatorCredentials {
    pub username: String,
    /// argon2 哈希；非 argon2 值按明文做常量时间比较（迁移期兼容）。
    pub password_hash: String,
}

/// 认证服务实现（运维账号 + JWT）。
pub struct AuthService {
    credentials: OperatorCredentials,
    jwt: JwtManager,
}

impl AuthService {
    /// 创建认证服务实例。
    pub fn new(credentials: OperatorCredentials, jwt: JwtManager) -> Self {
        Self { credentials, jwt }
    }

    /// 登录校验并签发 access token。
    pub fn login(&self, username: &str, password: &str) -> Result<AuthTokens, AuthError> {
        if username != self.credentials.username {
            return Err(AuthError::InvalidCredentials);
        }
        let check = verify_password(&self.credentials.password_hash, password)?;
        if !check.verified {
            return Err(AuthError::InvalidCredentials);
        }
        if check.upgrade_hash.is_some() {
            // 明文口令仅迁移期兼容；哈希本身不落日志
            warn!("operator password is stored in plaintext; replace it with an argon2 hash");
        }
        let access_token = self.jwt.issue_access(username)?;
        Ok(AuthTokens {
            access_token,
            expires_in: self.jwt.access_ttl_seconds(),
        })
    }

    /// 校验 access token 并提取操作者用户名。
    pub fn verify_access_token(&self, token: &str) -> Result<String, AuthError> {
        self.jwt.decode_access(token)
    }
}
