use std::collections::HashMap;
use std::sync::Arc;

use features::{FlowActionFeatures, ViewClassFeature, ViewClassFeatures};
use parking_lot::Mutex;
use schema::ClassName;
use tracing::{debug, trace};
use util::ResultExt;

use crate::{
    AreaKind, ConfirmationGate, ConfirmationPrompt, DomainObject, FlowContext, FlowError,
    FlowEvent, Form, FormRegistry, GateDecision, InvocationMode, NavigationEntry,
    NavigationHistory, ObjectArena, ObjectHandle, ObjectId, PendingConfirmation, Position,
    PositionRules, PushOutcome, SessionId,
};

/// What to navigate to.
#[derive(Debug, Clone)]
pub enum Target {
    /// An object already known to the session.
    Object(ObjectId),
    /// A live instance; adopted on first sight.
    Instance(Arc<dyn DomainObject>),
    /// The session instance of a class, created on demand.
    Class(ClassName),
}

impl From<ObjectId> for Target {
    fn from(value: ObjectId) -> Self {
        Target::Object(value)
    }
}

impl From<Arc<dyn DomainObject>> for Target {
    fn from(value: Arc<dyn DomainObject>) -> Self {
        Target::Instance(value)
    }
}

impl From<ClassName> for Target {
    fn from(value: ClassName) -> Self {
        Target::Class(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    Shown(ObjectId),
    /// Same object and position as the current entry; shown again without a new step.
    Refreshed(ObjectId),
    /// A popup is active and the target is not a popup position.
    Suppressed,
    /// The target could not be resolved to an object.
    Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Executed,
    /// A prompt was shown instead; answer it with [`Navigator::respond`].
    AwaitingConfirmation(ObjectId),
    Declined,
}

#[derive(Debug, Default)]
struct SessionState {
    history: NavigationHistory,
    objects: ObjectArena,
    active_area: Option<String>,
    pending: HashMap<ObjectId, PendingConfirmation>,
}

/// Per-session navigation over forms.
///
/// Session state lives behind one mutex keyed by session; calls of different sessions only
/// contend for the map itself. Forms, views and the executor are always called with no lock
/// held, and the schema is never read while the session map is locked.
pub struct Navigator {
    cx: FlowContext,
    rules: PositionRules,
    gate: ConfirmationGate,
    forms: FormRegistry,
    state: Mutex<HashMap<SessionId, SessionState>>,
}

impl Navigator {
    pub fn new(cx: FlowContext) -> Self {
        let rules = PositionRules::new(&cx.view_settings);
        let gate = ConfirmationGate::new(cx.localizer.clone(), &cx.flow_settings);
        let forms = FormRegistry::new(cx.sessions.clone());
        Self {
            cx,
            rules,
            gate,
            forms,
            state: Mutex::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &FlowContext {
        &self.cx
    }

    pub fn forms(&self) -> &FormRegistry {
        &self.forms
    }

    pub fn rules(&self) -> &PositionRules {
        &self.rules
    }

    /// The active session of the provider.
    pub fn active_session(&self) -> Result<SessionId, FlowError> {
        self.cx
            .sessions
            .active_session()
            .ok_or(FlowError::NoActiveSession)
    }

    fn with_state<R>(
        &self,
        session: SessionId,
        f: impl FnOnce(&mut SessionState) -> R,
    ) -> Result<R, FlowError> {
        let mut state = self.state.lock();
        let session_state = state
            .get_mut(&session)
            .ok_or(FlowError::UnknownSession(session))?;
        Ok(f(session_state))
    }

    pub fn session_started(&self, session: SessionId) {
        self.state.lock().entry(session).or_default();
        self.forms.open_session(session);
        debug!(%session, "session started");
    }

    /// Destroy every form of the session and drop its history, objects and pending prompts.
    pub fn session_ended(&self, session: SessionId) -> usize {
        let discarded = self.state.lock().remove(&session);
        let forms = self.forms.teardown(session);
        if let Some(state) = discarded {
            debug!(
                %session,
                forms,
                objects = state.objects.len(),
                pending = state.pending.len(),
                "session ended"
            );
        }
        self.cx
            .events
            .publish(FlowEvent::SessionEnded { session, forms });
        forms
    }

    pub fn adopt(
        &self,
        session: SessionId,
        object: Arc<dyn DomainObject>,
    ) -> Result<ObjectId, FlowError> {
        self.with_state(session, |s| s.objects.adopt(object))
    }

    pub fn object(&self, session: SessionId, id: ObjectId) -> Option<ObjectHandle> {
        self.with_state(session, |s| s.objects.get(id).cloned())
            .ok()
            .flatten()
    }

    pub fn active_area(&self, session: SessionId) -> Option<String> {
        self.with_state(session, |s| s.active_area.clone())
            .ok()
            .flatten()
    }

    pub fn history_depth(&self, session: SessionId, area: &str) -> usize {
        self.with_state(session, |s| s.history.depth(area))
            .unwrap_or_default()
    }

    /// Top entry of the active area.
    pub fn current(&self, session: SessionId) -> Option<ObjectHandle> {
        self.with_state(session, |s| {
            let area = s.active_area.as_deref()?;
            let top = s.history.top(area)?;
            s.objects.get(top.object).cloned()
        })
        .ok()
        .flatten()
    }

    fn resolve(&self, session: SessionId, target: Target) -> Result<Option<ObjectHandle>, FlowError> {
        match target {
            Target::Object(id) => self.with_state(session, |s| s.objects.get(id).cloned()),
            Target::Instance(object) => self.with_state(session, |s| {
                let id = s.objects.adopt(object);
                s.objects.get(id).cloned()
            }),
            Target::Class(class) => {
                if !self.cx.schema.read().contains(class.as_str()) {
                    debug!(%session, %class, "class not in schema");
                    return Ok(None);
                }
                let existing = self.with_state(session, |s| {
                    s.objects
                        .singleton(class.as_str())
                        .and_then(|id| s.objects.get(id).cloned())
                })?;
                if existing.is_some() {
                    return Ok(existing);
                }
                let Some(created) = self.cx.objects.as_ref().and_then(|f| f.create(&class)) else {
                    debug!(%session, %class, "no instance for class");
                    return Ok(None);
                };
                self.with_state(session, |s| {
                    // Another call may have created the singleton meanwhile.
                    let id = match s.objects.singleton(class.as_str()) {
                        Some(id) => id,
                        None => {
                            let id = s.objects.adopt(created);
                            s.objects.set_singleton(id);
                            id
                        }
                    };
                    s.objects.get(id).cloned()
                })
            }
        }
    }

    /// Area named by the class `layout` feature, if it is a screen position.
    fn class_area(&self, class: &ClassName) -> Option<String> {
        let schema = self.cx.schema.read();
        let layout =
            schema.class_feature::<ViewClassFeatures>(class.as_str(), ViewClassFeature::Layout)?;
        self.rules.screen_area(layout.as_text()?)
    }

    fn display_area(
        &self,
        requested: Option<&Position>,
        form_area: Option<String>,
        class_area: Option<String>,
        active: Option<&str>,
    ) -> String {
        requested
            .map(|p| p.area().to_owned())
            .or(form_area)
            .or(class_area)
            .or_else(|| active.map(ToOwned::to_owned))
            .unwrap_or_else(|| self.rules.default_area().to_owned())
    }

    fn display(
        &self,
        session: SessionId,
        handle: &ObjectHandle,
        area: &str,
        existing: Option<Arc<dyn Form>>,
    ) -> Result<(), FlowError> {
        let form = match existing {
            Some(form) => form,
            None => {
                let form = self.cx.views.create_form(session, handle);
                self.forms
                    .associate(Some(session), handle.id, form.clone())?;
                form
            }
        };
        form.show(area);
        self.cx.events.publish(FlowEvent::Shown {
            session,
            object: handle.id,
            area: area.to_owned(),
        });
        Ok(())
    }

    /// Close the form of `object` and forget the object once no history refers to it.
    fn close(&self, session: SessionId, object: ObjectId) {
        if let Some(form) = self.forms.remove(Some(session), object) {
            form.close();
            self.cx
                .events
                .publish(FlowEvent::Closed { session, object });
        }
        self.release_unused(session, object);
    }

    /// Drop a closed object unless history still refers to it. Class instances stay for the session.
    fn release_unused(&self, session: SessionId, object: ObjectId) {
        let released = self.with_state(session, |s| {
            s.pending.remove(&object);
            let singleton = s
                .objects
                .get(object)
                .is_some_and(|h| s.objects.singleton(h.class.as_str()) == Some(object));
            if singleton || s.history.contains_anywhere(object) {
                return false;
            }
            s.objects.release(object).is_some()
        });
        if released.unwrap_or_default() {
            trace!(%session, %object, "object released");
        }
    }

    /// Navigate to `target`, pushing a history step unless it repeats the current one.
    pub fn forward(
        &self,
        session: SessionId,
        target: impl Into<Target>,
        position: Option<&str>,
    ) -> Result<ForwardOutcome, FlowError> {
        let Some(handle) = self.resolve(session, target.into())? else {
            return Ok(ForwardOutcome::Unresolved);
        };
        let requested = position.map(|raw| self.rules.parse(raw));
        let existing = self.forms.lookup(Some(session), handle.id);
        let form_area = existing.as_ref().and_then(|f| f.screen_area());
        let class_area = self.class_area(&handle.class);

        let (pushed, area) = {
            let mut state = self.state.lock();
            let s = state
                .get_mut(&session)
                .ok_or(FlowError::UnknownSession(session))?;

            let in_popup = s
                .active_area
                .as_deref()
                .is_some_and(|area| self.rules.area_kind(area) == AreaKind::Popup);
            if in_popup && requested.as_ref().is_some_and(|p| !p.is_popup()) {
                debug!(%session, object = %handle.id, ?position, "forward suppressed inside popup");
                return Ok(ForwardOutcome::Suppressed);
            }

            let area = self.display_area(
                requested.as_ref(),
                form_area,
                class_area,
                s.active_area.as_deref(),
            );
            let mut entry = NavigationEntry::new(handle.id, position.map(ToOwned::to_owned), &area);
            if self.rules.area_kind(&area) == AreaKind::Popup && s.history.depth(&area) == 0 {
                entry = entry.opened_as_popup(s.active_area.clone());
            }
            let pushed = s.history.push(entry);
            s.active_area = Some(area.clone());
            (pushed, area)
        };

        self.display(session, &handle, &area, existing)?;
        Ok(match pushed {
            PushOutcome::Pushed => ForwardOutcome::Shown(handle.id),
            PushOutcome::Refreshed => ForwardOutcome::Refreshed(handle.id),
        })
    }

    /// Step back in the active area and return the object now on top.
    ///
    /// Leaving the first entry of a popup closes the popup and returns to the area it was
    /// opened from.
    pub fn back(&self, session: SessionId) -> Result<Option<ObjectHandle>, FlowError> {
        let (popped, next) = {
            let mut state = self.state.lock();
            let s = state
                .get_mut(&session)
                .ok_or(FlowError::UnknownSession(session))?;
            let Some(area) = s.active_area.clone() else {
                return Ok(None);
            };
            let Some(popped) = s.history.pop(&area) else {
                return Ok(None);
            };
            if popped.opened_as_popup {
                s.active_area = popped.opened_from.clone();
            }
            let next = s
                .active_area
                .as_deref()
                .and_then(|area| s.history.top(area))
                .and_then(|top| {
                    let handle = s.objects.get(top.object)?.clone();
                    Some((handle, top.area.clone()))
                });
            (popped, next)
        };
        trace!(%session, object = %popped.object, area = %popped.area, "history pop");

        if popped.opened_as_popup {
            self.close(session, popped.object);
            return Ok(next.map(|(handle, _)| handle));
        }
        match next {
            Some((handle, area)) => {
                let existing = self.forms.lookup(Some(session), handle.id);
                self.display(session, &handle, &area, existing)?;
                Ok(Some(handle))
            }
            None => Ok(None),
        }
    }

    /// Go back in the active area until `object` is on top.
    ///
    /// Returns `None` and leaves the history alone when `object` is not in it.
    pub fn back_until(
        &self,
        session: SessionId,
        object: ObjectId,
    ) -> Result<Option<ObjectHandle>, FlowError> {
        let found = self.with_state(session, |s| {
            let area = s.active_area.clone()?;
            let popped = s.history.back_until(&area, object)?;
            let handle = s.objects.get(object)?.clone();
            Some((handle, area, popped))
        })?;
        let Some((handle, area, popped)) = found else {
            return Ok(None);
        };

        for entry in popped.iter().filter(|e| e.opened_as_popup) {
            self.close(session, entry.object);
        }
        let existing = self.forms.lookup(Some(session), handle.id);
        self.display(session, &handle, &area, existing)?;
        Ok(Some(handle))
    }

    /// Drain the whole history, closing every popup it opened.
    pub fn clear_history(&self, session: SessionId) -> Result<usize, FlowError> {
        let drained = self.with_state(session, |s| {
            s.active_area = None;
            s.history.drain()
        })?;
        for entry in drained.iter().filter(|e| e.opened_as_popup) {
            self.close(session, entry.object);
        }
        debug!(%session, entries = drained.len(), "history cleared");
        Ok(drained.len())
    }

    /// Display an object without recording a history step. Returns the area used.
    pub fn show(
        &self,
        session: SessionId,
        object: ObjectId,
        position: Option<&str>,
    ) -> Result<Option<String>, FlowError> {
        let Some(handle) = self.object(session, object) else {
            return Ok(None);
        };
        let requested = position.map(|raw| self.rules.parse(raw));
        let existing = self.forms.lookup(Some(session), object);
        let form_area = existing.as_ref().and_then(|f| f.screen_area());
        let class_area = self.class_area(&handle.class);
        let active = self.active_area(session);
        let area = self.display_area(
            requested.as_ref(),
            form_area,
            class_area,
            active.as_deref(),
        );
        self.display(session, &handle, &area, existing)?;
        Ok(Some(area))
    }

    fn flow_features(
        &self,
        class: &ClassName,
        action: &str,
    ) -> Result<FlowActionFeatures, FlowError> {
        let schema = self.cx.schema.read();
        let declared = schema
            .action(class.as_str(), action)
            .ok_or_else(|| FlowError::UnknownAction {
                class: class.clone(),
                action: action.to_owned(),
            })?;
        Ok(declared
            .features
            .or_default::<FlowActionFeatures>()
            .into_owned())
    }

    /// Invoke `action` on `object`, detouring through a prompt when it requires confirmation.
    pub fn invoke_action(
        &self,
        session: SessionId,
        object: ObjectId,
        action: &str,
        mode: InvocationMode,
    ) -> Result<ActionOutcome, FlowError> {
        let handle = self
            .object(session, object)
            .ok_or(FlowError::UnknownObject(object))?;
        let features = self.flow_features(&handle.class, action)?;

        match self.gate.check(&features, handle.class.as_str(), action, mode) {
            GateDecision::Proceed => {
                self.cx.executor.invoke(session, &handle, action)?;
                self.after_action(session, &features)?;
                Ok(ActionOutcome::Executed)
            }
            GateDecision::Confirm(message) => {
                let prompt = self.adopt(
                    session,
                    Arc::new(ConfirmationPrompt::new(message, object, action)),
                )?;
                self.with_state(session, |s| {
                    s.pending.insert(
                        prompt,
                        PendingConfirmation {
                            prompt,
                            target: object,
                            action: action.to_owned(),
                        },
                    )
                })?;
                let position = self.cx.flow_settings.confirm_position.clone();
                if self.forward(session, prompt, Some(&position))? == ForwardOutcome::Suppressed {
                    self.show(session, prompt, Some(&position))?;
                }
                self.cx.events.publish(FlowEvent::ConfirmationRequested {
                    session,
                    prompt,
                    action: action.to_owned(),
                });
                Ok(ActionOutcome::AwaitingConfirmation(prompt))
            }
        }
    }

    /// Answer a pending prompt. `yes` runs the original action once, bypassing the gate.
    pub fn respond(
        &self,
        session: SessionId,
        prompt: ObjectId,
        yes: bool,
    ) -> Result<ActionOutcome, FlowError> {
        let pending = self
            .with_state(session, |s| s.pending.remove(&prompt))?
            .ok_or(FlowError::NoPendingConfirmation(prompt))?;
        self.dismiss(session, prompt)
            .log_err_with("dismissing confirmation prompt");

        if !yes {
            debug!(%session, action = %pending.action, "confirmation declined");
            return Ok(ActionOutcome::Declined);
        }
        self.invoke_action(
            session,
            pending.target,
            &pending.action,
            InvocationMode::Confirmed,
        )
    }

    fn dismiss(&self, session: SessionId, prompt: ObjectId) -> Result<(), FlowError> {
        if self.current(session).is_some_and(|top| top.id == prompt) {
            self.back(session)?;
        }
        self.close(session, prompt);
        Ok(())
    }

    /// Route after an executed action: `back` wins over `next`.
    pub fn after_action(
        &self,
        session: SessionId,
        features: &FlowActionFeatures,
    ) -> Result<(), FlowError> {
        if features.back.is_true() {
            self.back(session)?;
        } else if let Some(next) = features.next.as_deref() {
            self.forward(
                session,
                ClassName::from(next),
                features.position.as_deref(),
            )?;
        }
        Ok(())
    }

    /// Ask every form bound to `class` (or a subclass), in every session, to refresh.
    pub fn signal_updated_class(&self, class: &str) -> usize {
        let by_session = {
            let schema = self.cx.schema.read();
            self.forms.lookup_all_sessions_by_class(class, &schema)
        };
        let mut refreshed = 0;
        for (session, forms) in by_session {
            for form in forms {
                form.refresh();
                self.cx.events.publish(FlowEvent::Refresh {
                    session,
                    object: form.object(),
                    class: form.class().clone(),
                });
                refreshed += 1;
            }
        }
        debug!(class, refreshed, "class update signalled");
        refreshed
    }
}
