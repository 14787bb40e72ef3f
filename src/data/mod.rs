//! Database repository layer.
//!
//! Repositories wrap SeaORM queries for one table each and convert entity models into domain
//! models. They are generic over `ConnectionTrait` so the same repository can run against the
//! connection pool or inside a transaction.

pub mod bungie_token;
pub mod linked_account;
pub mod meeting;
pub mod meeting_channel;
pub mod meeting_member;

#[cfg(test)]
mod test;
