//! Two-option modal interposed before a save or delete reaches the store.

use tracing::{info, warn};

use crate::models::{Entity, FormData};
use crate::store::Store;

use super::app::{StatusKind, StatusMessage};
use super::helpers::surface_store_error;
use super::input::LogicalKey;

/// The write waiting behind the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Save,
    Delete,
}

impl PendingAction {
    /// Saving defaults to yes, deleting defaults to no, so a stray Enter can
    /// never destroy a record.
    pub fn default_choice(self) -> Choice {
        match self {
            PendingAction::Save => Choice::Yes,
            PendingAction::Delete => Choice::No,
        }
    }
}

/// Highlighted option. `No` sits on the left (index 0), `Yes` on the right
/// (index 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    No,
    Yes,
}

impl Choice {
    pub fn index(self) -> usize {
        match self {
            Choice::No => 0,
            Choice::Yes => 1,
        }
    }
}

/// What the controller should do after a key reached the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateDecision {
    Ignored,
    Moved,
    Cancel,
    Execute,
}

/// Left/Right pick an option directly rather than toggling.
pub(crate) fn handle_key(choice: &mut Choice, key: LogicalKey) -> GateDecision {
    let target = match key {
        LogicalKey::Left => Choice::No,
        LogicalKey::Right => Choice::Yes,
        LogicalKey::Enter => {
            return match choice {
                Choice::Yes => GateDecision::Execute,
                Choice::No => GateDecision::Cancel,
            }
        }
        LogicalKey::Escape => return GateDecision::Cancel,
        _ => return GateDecision::Ignored,
    };

    if *choice == target {
        GateDecision::Ignored
    } else {
        *choice = target;
        GateDecision::Moved
    }
}

/// Prompt shown inside the modal.
pub(crate) fn prompt(entity: Entity, action: PendingAction, editing_id: Option<i64>) -> String {
    let noun = entity.label().to_lowercase();
    match (action, editing_id) {
        (PendingAction::Save, None) => format!("Create this {noun}?"),
        (PendingAction::Save, Some(id)) => format!("Save changes to {noun} #{id}?"),
        (PendingAction::Delete, Some(id)) => {
            format!("Delete {noun} #{id}? This cannot be undone.")
        }
        (PendingAction::Delete, None) => format!("Discard this new {noun}?"),
    }
}

/// Run the pending write and describe the outcome. Store failures, including
/// a record that vanished since the form opened, end up in the returned
/// message and never propagate further.
pub(crate) fn execute<S: Store>(
    store: &mut S,
    entity: Entity,
    action: PendingAction,
    editing_id: Option<i64>,
    form_data: &FormData,
) -> StatusMessage {
    let result = match (action, editing_id) {
        (PendingAction::Save, None) => store
            .create(entity, form_data)
            .map(|record| Ok(format!("{entity} #{} created.", record.id()))),
        (PendingAction::Save, Some(id)) => {
            store.update(entity, id, form_data).map(|updated| match updated {
                Some(_) => Ok(format!("{entity} #{id} updated.")),
                None => Err(format!("Save failed: {entity} #{id} no longer exists.")),
            })
        }
        (PendingAction::Delete, Some(id)) => store.delete(entity, id).map(|deleted| {
            if deleted {
                Ok(format!("{entity} #{id} deleted."))
            } else {
                Err(format!("Delete failed: {entity} #{id} no longer exists."))
            }
        }),
        (PendingAction::Delete, None) => Ok(Err("Delete failed: nothing is selected.".into())),
    };

    let verb = match action {
        PendingAction::Save => "Save",
        PendingAction::Delete => "Delete",
    };

    match result {
        Ok(Ok(text)) => {
            info!(%entity, ?editing_id, ?action, "write committed");
            StatusMessage::new(text, StatusKind::Info)
        }
        Ok(Err(text)) => {
            warn!(%entity, ?editing_id, ?action, "write target missing");
            StatusMessage::new(text, StatusKind::Error)
        }
        Err(err) => {
            warn!(%entity, ?editing_id, ?action, error = %err, "write failed");
            StatusMessage::new(
                format!("{verb} failed: {}", surface_store_error(&err)),
                StatusKind::Error,
            )
        }
    }
}
