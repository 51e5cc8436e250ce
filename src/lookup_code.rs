//! Customer lookup codes: six characters from `A-Z0-9`, unique per order.

use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, SqlErr};

use crate::{
    entity::orders::{Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
};

pub const CODE_LEN: usize = 6;
pub const MAX_ATTEMPTS: usize = 1000;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn random_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LEN && code.bytes().all(|b| ALPHABET.contains(&b))
}

pub async fn code_in_use<C: ConnectionTrait>(conn: &C, code: &str) -> AppResult<bool> {
    let count = Orders::find()
        .filter(OrderCol::LookupCode.eq(code))
        .count(conn)
        .await?;
    Ok(count > 0)
}

/// Draw random codes until one is not held by any stored order.
pub async fn generate_code<C: ConnectionTrait>(conn: &C) -> AppResult<String> {
    generate_code_with(conn, || random_code(&mut rand::thread_rng())).await
}

pub async fn generate_code_with<C, F>(conn: &C, mut candidate: F) -> AppResult<String>
where
    C: ConnectionTrait,
    F: FnMut() -> String,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let code = candidate();
        if !code_in_use(conn, &code).await? {
            return Ok(code);
        }
        tracing::warn!(attempt, "lookup code collision");
    }
    Err(AppError::CodeSpaceExhausted)
}

/// The storage layer rejected a duplicate code that was free when checked.
pub fn is_code_collision(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
