//! Shared fixtures for the rule tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::domain::{
    Message, MessageDraft, Profile, ProfileDraft, ProfileId, Project, ProjectDraft, Role,
    ThreadId,
};
use crate::ports::{FixedClock, Stores};

pub(crate) fn fixture() -> (Stores, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 6, 3, 7, 30, 0).unwrap(),
    ));
    (Stores::in_memory(clock.clone()), clock)
}

pub(crate) async fn profile(stores: &Stores, role: Role, name: &str) -> Profile {
    stores
        .profiles
        .create(ProfileDraft {
            email: format!("{}@example.com", name.to_lowercase()),
            role,
            display_name: name.to_string(),
            company_name: None,
            trade_category: None,
        })
        .await
        .unwrap()
}

pub(crate) async fn project(stores: &Stores, gc_id: ProfileId, name: &str) -> Project {
    stores
        .projects
        .create(ProjectDraft {
            name: name.to_string(),
            gc_profile_id: gc_id,
            address: None,
        })
        .await
        .unwrap()
}

pub(crate) async fn seed_messages(
    stores: &Stores,
    thread_id: ThreadId,
    sender: &Profile,
    count: usize,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(count);
    for i in 0..count {
        let message = stores
            .messages
            .create(MessageDraft {
                thread_id,
                sender_profile_id: sender.id,
                sender_role: sender.role,
                body: format!("message {i}"),
            })
            .await
            .unwrap();
        messages.push(message);
    }
    messages
}
