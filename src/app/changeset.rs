//! Change-preview workflow.
//!
//! A change set is always ephemeral here: it is created, polled to a
//! terminal status, read, and then deleted in the same call. The deletion
//! attempt is unconditional once creation succeeded, so no preview object
//! can leak, and a "change set not found" during the cleanup poll counts
//! as already-deleted.

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

use crate::app::api::{Change, ChangeSetParams, ChangeSetSnapshot, CloudApi};
use crate::app::error::Result;
use crate::app::poller::{wait_until_terminal, PollTarget};

/// Preview names are `<stackName>-<uuid>` so concurrent runs against the
/// same stack cannot collide.
pub fn change_set_name(stack_name: &str) -> String {
    format!("{stack_name}-{}", Uuid::new_v4())
}

struct ChangeSetPoll<'a> {
    api: &'a dyn CloudApi,
    change_set: String,
}

#[async_trait]
impl PollTarget for ChangeSetPoll<'_> {
    type Snapshot = ChangeSetSnapshot;

    async fn fetch(&mut self) -> Result<ChangeSetSnapshot> {
        Ok(self.api.describe_change_set(&self.change_set).await?)
    }

    fn is_terminal(&self, snapshot: &ChangeSetSnapshot) -> bool {
        snapshot.is_terminal()
    }
}

/// Create the preview, poll it to completion, extract its changes, then
/// delete it. Returns `None` when the preview failed to materialize
/// changes.
pub async fn preview(api: &dyn CloudApi, params: ChangeSetParams) -> Result<Option<Vec<Change>>> {
    let name = params.change_set_name.clone();
    info!("Creating ChangeSet: {name}");

    let change_set_id = api.create_change_set(params).await?;

    // From here on the preview exists remotely; cleanup must run no matter
    // how the creation poll went.
    let creation = wait_until_terminal(&mut ChangeSetPoll {
        api,
        change_set: change_set_id.clone(),
    })
    .await;

    let changes = match &creation {
        Ok(snapshot) if snapshot.status == "CREATE_COMPLETE" => Some(snapshot.changes.clone()),
        Ok(snapshot) => {
            error!(
                "Create ChangeSet failed: {}",
                snapshot.status_reason.as_deref().unwrap_or("unknown")
            );
            None
        }
        Err(_) => None,
    };

    info!("Deleting ChangeSet: {name}");
    delete_and_wait(api, &change_set_id).await?;

    // Surface a creation-poll failure only after the cleanup attempt.
    creation?;

    Ok(changes)
}

/// Delete a change set and poll the deletion to `DELETE_COMPLETE`. A
/// not-found during the poll means the change set already vanished, which
/// is successful cleanup.
async fn delete_and_wait(api: &dyn CloudApi, change_set_id: &str) -> Result<()> {
    api.delete_change_set(change_set_id).await?;

    let wait = wait_until_terminal(&mut ChangeSetPoll {
        api,
        change_set: change_set_id.to_string(),
    })
    .await;

    match wait {
        Ok(snapshot) => {
            if snapshot.status != "DELETE_COMPLETE" {
                error!(
                    "Delete ChangeSet failed: {}",
                    snapshot.status_reason.as_deref().unwrap_or("unknown")
                );
            }
            Ok(())
        }
        Err(err) if err.is_not_found() => Ok(()),
        Err(err) => Err(err),
    }
}
