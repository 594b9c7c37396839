//! Recurring-template CRUD and lifecycle transitions.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::core::{Clock, CoreError, CoreResult};
use crate::domain::{Category, RecurringStatus, RecurringTemplate, RenewalFrequency, TransactionKind};
use crate::store::MemoryStore;

#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub category: Category,
    pub kind: TransactionKind,
    pub frequency: RenewalFrequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Mutable subset of a template; the start date stays the schedule anchor.
#[derive(Debug, Clone)]
pub struct TemplateUpdate {
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub category: Category,
    pub kind: TransactionKind,
    pub frequency: RenewalFrequency,
    pub end_date: Option<NaiveDate>,
}

pub struct RecurringService;

impl RecurringService {
    pub fn create(
        store: &MemoryStore,
        user_id: Uuid,
        input: NewTemplate,
        clock: &dyn Clock,
    ) -> CoreResult<RecurringTemplate> {
        validate_fields(&input.title, input.amount)?;
        if input.start_date < clock.today() {
            return Err(CoreError::Validation(
                "start date must not be in the past".into(),
            ));
        }
        if let Some(end) = input.end_date {
            if end <= input.start_date {
                return Err(CoreError::Validation(
                    "end date must be after the start date".into(),
                ));
            }
        }
        store.atomically(|state| {
            state
                .user(user_id)
                .ok_or(CoreError::UserNotFound(user_id))?;
            let template = RecurringTemplate::new(
                user_id,
                input.title.clone(),
                input.description.clone(),
                input.amount,
                input.category,
                input.kind,
                input.frequency,
                input.start_date,
                input.end_date,
                clock.now(),
            );
            info!(
                template_id = %template.id,
                user_id = %user_id,
                frequency = %template.frequency,
                "recurring template created"
            );
            state.recurring.push(template.clone());
            Ok(template)
        })
    }

    pub fn update(
        store: &MemoryStore,
        user_id: Uuid,
        template_id: Uuid,
        input: TemplateUpdate,
        clock: &dyn Clock,
    ) -> CoreResult<RecurringTemplate> {
        validate_fields(&input.title, input.amount)?;
        store.atomically(|state| {
            let template = state
                .template_mut(template_id)
                .filter(|t| t.user_id == user_id)
                .ok_or(CoreError::TemplateNotFound(template_id))?;
            if let Some(end) = input.end_date {
                if end <= template.start_date {
                    return Err(CoreError::Validation(
                        "end date must be after the start date".into(),
                    ));
                }
            }
            let frequency_changed = template.frequency != input.frequency;
            template.title = input.title.clone();
            template.description = input.description.clone();
            template.amount = input.amount;
            template.category = input.category;
            template.kind = input.kind;
            template.frequency = input.frequency;
            template.end_date = input.end_date;
            if frequency_changed {
                // Re-derive from the immutable anchor so the occurrence
                // history stays consistent under the new cadence.
                template.next_occurrence = template.derived_next_occurrence();
            }
            template.modified_at = clock.now();
            info!(template_id = %template_id, user_id = %user_id, "recurring template updated");
            Ok(template.clone())
        })
    }

    pub fn pause(
        store: &MemoryStore,
        user_id: Uuid,
        template_id: Uuid,
        clock: &dyn Clock,
    ) -> CoreResult<RecurringTemplate> {
        Self::transition(store, user_id, template_id, RecurringStatus::Paused, clock)
    }

    pub fn resume(
        store: &MemoryStore,
        user_id: Uuid,
        template_id: Uuid,
        clock: &dyn Clock,
    ) -> CoreResult<RecurringTemplate> {
        Self::transition(store, user_id, template_id, RecurringStatus::Active, clock)
    }

    /// Cancels the template. Terminal: a cancelled template can never be
    /// paused, resumed, or processed again.
    pub fn cancel(
        store: &MemoryStore,
        user_id: Uuid,
        template_id: Uuid,
        clock: &dyn Clock,
    ) -> CoreResult<RecurringTemplate> {
        Self::transition(store, user_id, template_id, RecurringStatus::Cancelled, clock)
    }

    pub fn delete(store: &MemoryStore, user_id: Uuid, template_id: Uuid) -> CoreResult<()> {
        store.atomically(|state| {
            let position = state
                .recurring
                .iter()
                .position(|t| t.id == template_id && t.user_id == user_id)
                .ok_or(CoreError::TemplateNotFound(template_id))?;
            state.recurring.remove(position);
            for txn in state
                .transactions
                .iter_mut()
                .filter(|t| t.recurring_id == Some(template_id))
            {
                txn.recurring_id = None;
            }
            info!(template_id = %template_id, user_id = %user_id, "recurring template deleted");
            Ok(())
        })
    }

    pub fn get(
        store: &MemoryStore,
        user_id: Uuid,
        template_id: Uuid,
    ) -> CoreResult<RecurringTemplate> {
        store.read(|state| {
            state
                .template(template_id)
                .filter(|t| t.user_id == user_id)
                .cloned()
                .ok_or(CoreError::TemplateNotFound(template_id))
        })
    }

    /// One user's templates, most recently created first.
    pub fn list(store: &MemoryStore, user_id: Uuid) -> Vec<RecurringTemplate> {
        store.read(|state| {
            let mut items: Vec<RecurringTemplate> = state
                .recurring
                .iter()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect();
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            items
        })
    }

    fn transition(
        store: &MemoryStore,
        user_id: Uuid,
        template_id: Uuid,
        target: RecurringStatus,
        clock: &dyn Clock,
    ) -> CoreResult<RecurringTemplate> {
        store.atomically(|state| {
            let template = state
                .template_mut(template_id)
                .filter(|t| t.user_id == user_id)
                .ok_or(CoreError::TemplateNotFound(template_id))?;
            if template.status.is_terminal() {
                return Err(CoreError::InvalidOperation(
                    "a cancelled recurring transaction cannot change status".into(),
                ));
            }
            template.status = target;
            template.modified_at = clock.now();
            info!(
                template_id = %template_id,
                user_id = %user_id,
                status = %target,
                "recurring template status changed"
            );
            Ok(template.clone())
        })
    }
}

fn validate_fields(title: &str, amount: f64) -> CoreResult<()> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title is required".into()));
    }
    if amount <= 0.0 {
        return Err(CoreError::Validation(
            "amount must be greater than 0".into(),
        ));
    }
    Ok(())
}
