use chrono::{Duration, Utc};
use entity::{meeting::MeetingStatus, meeting_member::MemberStatus};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod meeting;
mod meeting_member;
