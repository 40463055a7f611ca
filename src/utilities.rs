pub mod token {
    use crate::errors::Result;
    use branca::Branca;
    use once_cell::sync::Lazy;
    use serde::{Deserialize, Serialize};

    // Per-boot key; issued tokens die with the process.
    static SECRET: Lazy<[u8; 32]> = Lazy::new(|| {
        let mut key = [0u8; 32];
        getrandom::fill(&mut key).unwrap();
        key
    });

    pub fn encode<T: Serialize>(value: &T) -> Result<String> {
        let string = serde_json::to_string(value)?;
        let data = string.as_bytes();
        Ok(Branca::new(SECRET.as_ref())?.encode(data)?)
    }

    pub fn decode<R: for<'a> Deserialize<'a>, T: AsRef<str>>(value: T) -> Result<R> {
        let data = Branca::new(SECRET.as_ref())?.decode(value.as_ref(), 0)?;
        let item = serde_json::from_slice(&data)?;
        Ok(item)
    }
}

pub mod password {
    use crate::errors::Result;
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    };

    pub fn hash<T: ToString>(value: T) -> Result<String> {
        Ok(Argon2::default()
            .hash_password(
                value.to_string().as_bytes(),
                &SaltString::generate(&mut OsRng),
            )?
            .to_string())
    }

    pub fn valid<T: ToString>(value: T, password: T) -> Result<()> {
        Ok(Argon2::default().verify_password(
            password.to_string().as_bytes(),
            &PasswordHash::new(&value.to_string().as_ref())?,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::payloads::UserClaims;

    #[test]
    fn test_token_roundtrip() {
        let claims = UserClaims {
            id: 7,
            username: "TEST".into(),
        };

        let token = token::encode(&claims).unwrap();
        let decoded: UserClaims = token::decode(&token).unwrap();

        assert_eq!(decoded.id, 7);
        assert_eq!(decoded.username, "TEST");
    }

    #[test]
    fn test_token_rejects_garbage() {
        let result: crate::errors::Result<UserClaims> = token::decode("not-a-token");
        assert!(result.is_err());
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hashed = password::hash("PASSWORD").unwrap();

        assert_ne!(hashed, "PASSWORD");
        assert!(password::valid(hashed.clone(), "PASSWORD".into()).is_ok());
        assert!(password::valid(hashed, "WRONG".into()).is_err());
    }
}
