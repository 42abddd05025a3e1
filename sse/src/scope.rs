use events::{Event, Id};

/// Which events one subscription may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionScope {
    organization_id: Id,
    task_id: Option<Id>,
}

impl SubscriptionScope {
    /// Every event in one organization.
    pub fn organization(organization_id: Id) -> Self {
        Self {
            organization_id,
            task_id: None,
        }
    }

    /// Events in one organization that concern one task.
    pub fn task(organization_id: Id, task_id: Id) -> Self {
        Self {
            organization_id,
            task_id: Some(task_id),
        }
    }

    pub fn organization_id(&self) -> Id {
        self.organization_id
    }

    pub fn task_id(&self) -> Option<Id> {
        self.task_id
    }

    /// Tenant equality is mandatory; task equality applies only when scoped to a task.
    pub fn matches(&self, event: &Event) -> bool {
        event.organization_id() == self.organization_id
            && self.task_id.map_or(true, |task_id| event.task_id() == task_id)
    }
}
