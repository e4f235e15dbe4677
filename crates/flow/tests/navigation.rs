mod common;

use std::sync::{Arc, OnceLock};

use common::{Call, Harness, Journal, NavigatorAwareViews};
use flow::{ActionOutcome, FlowError, FlowEvent, ForwardOutcome, InvocationMode};
use pretty_assertions::assert_eq;
use schema::ClassName;

#[test]
fn repeating_the_current_step_is_a_refresh() {
    let h = Harness::new();
    let s = h.session();
    let a = h.adopt(s, "Customer", "ann");

    assert_eq!(
        h.navigator.forward(s, a, Some("posX")).unwrap(),
        ForwardOutcome::Shown(a)
    );
    assert_eq!(
        h.navigator.forward(s, a, Some("posX")).unwrap(),
        ForwardOutcome::Refreshed(a)
    );
    assert_eq!(h.navigator.history_depth(s, "posX"), 1);
    assert_eq!(h.journal.count(|c| matches!(c, Call::Create(..))), 1);
    assert_eq!(h.journal.count(|c| matches!(c, Call::Show(..))), 2);
}

#[test]
fn back_until_pops_to_the_target_or_leaves_history_alone() {
    let h = Harness::new();
    let s = h.session();
    let [a, b, c, z] = ["a", "b", "c", "z"].map(|name| h.adopt(s, "Customer", name));
    for object in [a, b, c] {
        h.navigator.forward(s, object, Some("screen:main")).unwrap();
    }

    assert!(h.navigator.back_until(s, z).unwrap().is_none());
    assert_eq!(h.navigator.history_depth(s, "main"), 3);
    assert_eq!(h.navigator.current(s).map(|o| o.id), Some(c));

    let found = h.navigator.back_until(s, a).unwrap().map(|o| o.id);
    assert_eq!(found, Some(a));
    assert_eq!(h.navigator.history_depth(s, "main"), 1);
    assert_eq!(h.navigator.current(s).map(|o| o.id), Some(a));
}

#[test]
fn back_shows_the_previous_entry_and_stops_when_empty() {
    let h = Harness::new();
    let s = h.session();
    let a = h.adopt(s, "Customer", "a");
    let b = h.adopt(s, "Customer", "b");

    assert!(h.navigator.back(s).unwrap().is_none());

    h.navigator.forward(s, a, Some("screen:main")).unwrap();
    h.navigator.forward(s, b, Some("screen:main")).unwrap();

    assert_eq!(h.navigator.back(s).unwrap().map(|o| o.id), Some(a));
    assert_eq!(h.journal.last(), Some(Call::Show(a, "main".into())));
    assert!(h.navigator.back(s).unwrap().is_none());
    assert!(h.navigator.back(s).unwrap().is_none());
}

#[test]
fn popups_only_navigate_to_popup_positions() {
    let h = Harness::new();
    let s = h.session();
    let [a, b, c] = ["a", "b", "c"].map(|name| h.adopt(s, "Customer", name));

    h.navigator.forward(s, a, Some("screen:main")).unwrap();
    h.navigator.forward(s, b, Some("screen:popup")).unwrap();
    assert_eq!(h.navigator.active_area(s).as_deref(), Some("popup"));

    assert_eq!(
        h.navigator.forward(s, c, Some("screen:main")).unwrap(),
        ForwardOutcome::Suppressed
    );
    assert_eq!(h.navigator.history_depth(s, "main"), 1);
    assert_eq!(h.navigator.history_depth(s, "popup"), 1);

    // No position: stays inside the popup.
    assert_eq!(h.navigator.forward(s, c, None).unwrap(), ForwardOutcome::Shown(c));
    assert_eq!(h.navigator.history_depth(s, "popup"), 2);

    assert_eq!(h.navigator.back(s).unwrap().map(|o| o.id), Some(b));

    // Leaving the first popup entry closes the popup instead of re-showing `a`.
    assert_eq!(h.navigator.back(s).unwrap().map(|o| o.id), Some(a));
    assert_eq!(h.journal.last(), Some(Call::Close(b)));
    assert_eq!(h.navigator.active_area(s).as_deref(), Some("main"));
    assert!(h.navigator.forms().lookup(Some(s), b).is_none());
}

#[test]
fn clear_history_drains_and_closes_popups() {
    let h = Harness::new();
    let s = h.session();
    let [a, b, c] = ["a", "b", "c"].map(|name| h.adopt(s, "Customer", name));
    h.navigator.forward(s, a, Some("screen:main")).unwrap();
    h.navigator.forward(s, b, Some("screen:main")).unwrap();
    h.navigator.forward(s, c, Some("screen:popup")).unwrap();

    assert_eq!(h.navigator.clear_history(s).unwrap(), 3);
    assert_eq!(h.journal.count(|call| *call == Call::Close(c)), 1);
    assert_eq!(h.journal.count(|call| matches!(call, Call::Close(_))), 1);
    assert!(h.navigator.current(s).is_none());
    assert_eq!(h.navigator.history_depth(s, "main"), 0);
}

#[test]
fn classes_resolve_to_one_instance_per_session() {
    let h = Harness::new();
    let s1 = h.session();
    let s2 = h.session();

    let first = h.navigator.forward(s1, ClassName::from("Dashboard"), None).unwrap();
    let ForwardOutcome::Shown(dashboard) = first else {
        panic!("dashboard not shown: {first:?}");
    };
    // The class layout names the area.
    assert_eq!(h.navigator.active_area(s1).as_deref(), Some("left"));
    assert_eq!(
        h.navigator.forward(s1, ClassName::from("Dashboard"), None).unwrap(),
        ForwardOutcome::Refreshed(dashboard)
    );

    h.navigator.forward(s2, ClassName::from("Dashboard"), None).unwrap();
    assert_eq!(h.journal.count(|c| matches!(c, Call::Create(..))), 2);
}

#[test]
fn classes_outside_the_schema_do_not_resolve() {
    let h = Harness::new();
    let s = h.session();

    assert_eq!(
        h.navigator.forward(s, ClassName::from("Ghost"), None).unwrap(),
        ForwardOutcome::Unresolved
    );
    assert!(h.navigator.current(s).is_none());
    assert_eq!(h.journal.count(|c| matches!(c, Call::Create(..))), 0);
}

#[test]
fn forms_may_read_navigator_state_while_being_placed() {
    let slot = Arc::new(OnceLock::new());
    let views = Arc::new(NavigatorAwareViews {
        navigator: slot.clone(),
    });
    let h = Harness::with_views(views, Arc::new(Journal::default()));
    assert!(slot.set(Arc::downgrade(&h.navigator)).is_ok());
    let s = h.session();
    let a = h.adopt(s, "Customer", "a");

    assert_eq!(h.navigator.forward(s, a, None).unwrap(), ForwardOutcome::Shown(a));
    assert_eq!(
        h.navigator.forward(s, a, None).unwrap(),
        ForwardOutcome::Refreshed(a)
    );
    assert_eq!(h.navigator.show(s, a, None).unwrap().as_deref(), Some("body"));
}

#[test]
fn closed_popups_release_their_objects() {
    let h = Harness::new();
    let s = h.session();
    let [a, b] = ["a", "b"].map(|name| h.adopt(s, "Customer", name));
    h.navigator.forward(s, a, Some("screen:main")).unwrap();
    h.navigator.forward(s, b, Some("screen:popup")).unwrap();

    h.navigator.back(s).unwrap();
    assert!(h.navigator.object(s, b).is_none());
    assert!(h.navigator.object(s, a).is_some());

    // Class instances outlive their popup.
    let ForwardOutcome::Shown(dashboard) = h
        .navigator
        .forward(s, ClassName::from("Dashboard"), Some("screen:popup"))
        .unwrap()
    else {
        panic!("dashboard not shown");
    };
    h.navigator.back(s).unwrap();
    assert!(h.navigator.object(s, dashboard).is_some());
}

#[test]
fn leaving_a_prompt_with_back_drops_the_pending_confirmation() {
    let h = Harness::new();
    let s = h.session();
    let c = h.adopt(s, "Customer", "ann");
    h.navigator.forward(s, c, Some("screen:main")).unwrap();

    let outcome = h
        .navigator
        .invoke_action(s, c, "delete", InvocationMode::Normal)
        .unwrap();
    let ActionOutcome::AwaitingConfirmation(prompt) = outcome else {
        panic!("expected a prompt, got {outcome:?}");
    };
    assert_eq!(h.navigator.back(s).unwrap().map(|o| o.id), Some(c));

    assert!(h.navigator.object(s, prompt).is_none());
    assert_eq!(
        h.navigator.respond(s, prompt, true).unwrap_err(),
        FlowError::NoPendingConfirmation(prompt)
    );
    assert!(h.executor.calls().is_empty());
}

#[test]
fn explicit_position_beats_class_layout() {
    let h = Harness::new();
    let s = h.session();
    h.navigator
        .forward(s, ClassName::from("Dashboard"), Some("screen:main"))
        .unwrap();
    assert_eq!(h.navigator.active_area(s).as_deref(), Some("main"));
}

#[test]
fn show_does_not_touch_history() {
    let h = Harness::new();
    let s = h.session();
    let a = h.adopt(s, "Customer", "a");

    assert_eq!(h.navigator.show(s, a, None).unwrap().as_deref(), Some("body"));
    assert_eq!(h.navigator.history_depth(s, "body"), 0);
    assert!(h.navigator.forms().lookup(Some(s), a).is_some());
}

#[test]
fn session_end_destroys_every_form_once() {
    let mut h = Harness::new();
    let s = h.session();
    let other = h.session();
    let [a, b, c] = ["a", "b", "c"].map(|name| h.adopt(s, "Customer", name));
    h.navigator.forward(s, a, Some("screen:main")).unwrap();
    h.navigator.forward(s, b, Some("screen:main")).unwrap();
    h.navigator.forward(s, c, Some("screen:side")).unwrap();
    let kept = h.adopt(other, "Customer", "kept");
    h.navigator.forward(other, kept, None).unwrap();

    assert_eq!(h.navigator.session_ended(s), 3);
    for object in [a, b, c] {
        assert_eq!(h.journal.count(|call| *call == Call::Destroy(object)), 1);
    }
    assert!(!h.navigator.forms().contains_session(s));
    assert!(h.navigator.current(s).is_none());
    assert_eq!(h.navigator.history_depth(s, "main"), 0);
    assert_eq!(
        h.navigator.forward(s, a, None).unwrap_err(),
        FlowError::UnknownSession(s)
    );
    assert_eq!(h.navigator.session_ended(s), 0);

    assert!(h.navigator.forms().lookup(Some(other), kept).is_some());
    assert!(h
        .drain_events()
        .contains(&FlowEvent::SessionEnded { session: s, forms: 3 }));
}

#[test]
fn class_updates_refresh_forms_in_every_session() {
    let mut h = Harness::new();
    let s1 = h.session();
    let s2 = h.session();
    let c1 = h.adopt(s1, "Customer", "c1");
    let i1 = h.adopt(s1, "Invoice", "i1");
    let c2 = h.adopt(s2, "Customer", "c2");
    h.navigator.forward(s1, c1, None).unwrap();
    h.navigator.forward(s1, i1, None).unwrap();
    h.navigator.forward(s2, c2, None).unwrap();
    h.drain_events();

    assert_eq!(h.navigator.signal_updated_class("Party"), 2);
    assert_eq!(h.journal.count(|c| matches!(c, Call::Refresh(_))), 2);
    assert_eq!(h.journal.count(|c| *c == Call::Refresh(i1)), 0);

    let refreshed: Vec<_> = h
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, FlowEvent::Refresh { .. }))
        .collect();
    assert_eq!(refreshed.len(), 2);
}
