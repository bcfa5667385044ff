//! HTTP-level integration tests, run against an in-memory database and
//! the real router.

mod bookmarks;
mod entries;
mod health;
mod helpers;
mod profiles;
