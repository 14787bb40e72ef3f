//! Meetings Test Utils
//!
//! Shared testing utilities for the meetings bot. Provides a builder for test contexts backed
//! by in-memory SQLite databases plus factories for the meeting tables.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment holding the database connection
//! - **TestError**: Error types that can occur during test setup
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[tokio::test]
//! async fn joins_meeting() -> Result<(), TestError> {
//!     let test = TestBuilder::new().with_meeting_tables().build().await?;
//!     let db = test.db.as_ref().unwrap();
//!
//!     let (channel, meeting) = factory::helpers::create_meeting_with_channel(db).await?;
//!     // Perform meeting operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
