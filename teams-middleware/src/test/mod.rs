//! Unit test module
//!
//! Middleware unit tests live here, separate from source files.


use std::sync::Arc;

use async_trait::async_trait;
use teams_core::{Activity, ActivitySender, ResourceResponse, TurnContext};

struct NullSender;

#[async_trait]
impl ActivitySender for NullSender {
    async fn send_activities(
        &self,
        _activities: Vec<Activity>,
    ) -> teams_core::Result<Vec<ResourceResponse>> {
        Ok(vec![])
    }
}

pub(crate) fn context(activity: Activity) -> TurnContext {
    TurnContext::new(activity, Arc::new(NullSender))
}
