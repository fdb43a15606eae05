//! Tokio driver for autofill grace timers.
//!
//! [`FormSession`] is a pure state machine that only fires timers when told
//! what time it is. This wrapper shares a session with at most one sleeping
//! tokio task per field: every event re-reads the field's deadline from the
//! session, aborting the previous task first. Dropping the runtime aborts
//! every task and tears the session down, so no timer outlives its form.
//!
//! All methods must be called from within a tokio runtime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tokio::task::JoinHandle;

use crate::error::{FormError, FormResult};
use crate::services::field_controller::FieldProps;
use crate::services::form_session::FormSession;

struct PendingTimer {
    due_at: Instant,
    handle: JoinHandle<()>,
}

pub struct AutofillRuntime {
    session: Arc<Mutex<FormSession>>,
    timers: HashMap<String, PendingTimer>,
}

/// Current instant on tokio's clock, which tests can pause and advance.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

impl AutofillRuntime {
    pub fn new(session: FormSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            timers: HashMap::new(),
        }
    }

    pub fn session(&self) -> Arc<Mutex<FormSession>> {
        Arc::clone(&self.session)
    }

    /// Runs `f` against the locked session. Read-only so that every
    /// mutation goes through a method that keeps the timers in step.
    pub fn with_session<R>(&self, f: impl FnOnce(&FormSession) -> R) -> FormResult<R> {
        let guard = lock(&self.session)?;
        Ok(f(&guard))
    }

    pub fn change(&mut self, field: &str, value: impl Into<String>) -> FormResult<()> {
        let deadline = {
            let mut session = lock(&self.session)?;
            session.change(field, value, now())?;
            session.autofill_deadline(field)?
        };
        self.sync_timer(field, deadline);
        Ok(())
    }

    pub fn focus(&mut self, field: &str) -> FormResult<()> {
        lock(&self.session)?.focus(field)?;
        self.cancel_timer(field);
        Ok(())
    }

    pub fn blur(&mut self, field: &str) -> FormResult<()> {
        lock(&self.session)?.blur(field)?;
        self.cancel_timer(field);
        Ok(())
    }

    /// Re-render of one field. Disabling a field drops its timer.
    pub fn set_props(&mut self, field: &str, props: FieldProps) -> FormResult<()> {
        let deadline = {
            let mut session = lock(&self.session)?;
            session.set_props(field, props)?;
            session.autofill_deadline(field)?
        };
        self.sync_timer(field, deadline);
        Ok(())
    }

    pub fn add_dependency(&mut self, dependent: &str, source: &str) -> FormResult<()> {
        lock(&self.session)?.add_dependency(dependent, source)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers
            .values()
            .filter(|timer| !timer.handle.is_finished())
            .count()
    }

    /// Explicit unmount; same as dropping the runtime.
    pub fn teardown(self) {}

    fn sync_timer(&mut self, field: &str, deadline: Option<Instant>) {
        let Some(due_at) = deadline else {
            self.cancel_timer(field);
            return;
        };
        if let Some(timer) = self.timers.get(field) {
            if timer.due_at == due_at && !timer.handle.is_finished() {
                return;
            }
        }
        self.cancel_timer(field);

        let session = Arc::clone(&self.session);
        let name = field.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(tokio::time::Instant::from_std(due_at)).await;
            match lock(&session) {
                Ok(mut guard) => {
                    if let Err(err) = guard.poll_field(&name, now()) {
                        log::debug!("autofill timer for {} found no field: {}", name, err);
                    }
                }
                Err(_) => log::warn!("autofill timer for {} skipped, form state poisoned", name),
            }
        });
        tracing::trace!(field, "autofill timer spawned");
        self.timers.insert(field.to_string(), PendingTimer { due_at, handle });
    }

    fn cancel_timer(&mut self, field: &str) {
        if let Some(timer) = self.timers.remove(field) {
            timer.handle.abort();
        }
    }
}

impl Drop for AutofillRuntime {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
        match self.session.lock() {
            Ok(mut session) => session.teardown(),
            Err(poisoned) => poisoned.into_inner().teardown(),
        }
    }
}

fn lock(session: &Mutex<FormSession>) -> FormResult<MutexGuard<'_, FormSession>> {
    session.lock().map_err(|_| {
        log::warn!("form session lock was poisoned");
        FormError::StatePoisoned
    })
}
