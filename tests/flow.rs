//! Tests for dispatching presentations through a `Flow`.
mod common;
use common::*;
use navflow::prelude::*;
use std::sync::Arc;

#[test]
fn test_start_installs_root() {
    let mut flow = flow_builder().start_with(Config::replace_current(Screen::Main)).build();
    assert!(flow.current_destination_id().is_none());

    let root = flow.start();
    assert_eq!(root, flow.root_destination_id());
    assert_eq!(current_type(&flow), Some(Screen::Home));
    assert_eq!(active_types(&flow), vec![Screen::Main, Screen::Home]);
    assert_graph_invariants(&flow);
}

#[test]
fn test_start_without_presentation() {
    let mut flow = flow_builder().build();
    assert_eq!(flow.start(), None);
    assert!(flow.root_destination_id().is_none());
}

#[test]
fn test_missing_provider_is_a_noop() {
    let (log, completion) = completion_log();
    let mut flow = Flow::<AppRoutes>::builder()
        .with_logger(NavigationLogger::disabled())
        .start_with(Config::replace_current(Screen::Main).on_completion(completion))
        .build();

    assert_eq!(flow.start(), None);
    assert!(flow.registry().is_empty());
    assert_eq!(*log.lock().unwrap(), vec![false]);
}

#[test]
fn test_push_and_pop() {
    let mut flow = create_stack_flow();
    let main = flow.root_destination_id().unwrap();

    let detail = flow.present_destination(Config::push(Screen::Detail).with_content("7".to_string()));
    assert_eq!(flow.current_destination_id(), detail);
    assert_eq!(group_types(&flow, main), vec![Screen::Home, Screen::Detail]);
    let detail = detail.unwrap();
    assert_eq!(flow.destination(detail).unwrap().parent_id(), Some(main));
    assert_eq!(flow.destination(detail).unwrap().content().map(String::as_str), Some("7"));

    let revealed = flow.present_destination(Config::pop());
    assert_eq!(revealed, find(&flow, Screen::Home));
    assert_eq!(current_type(&flow), Some(Screen::Home));
    assert!(flow.destination(detail).is_none());
    assert!(!flow.is_active(detail));
    assert_graph_invariants(&flow);
}

#[test]
fn test_pop_at_root_fails() {
    let (log, completion) = completion_log();
    let mut flow = create_stack_flow();
    let before = flow.active_destinations().to_vec();

    assert_eq!(flow.present_destination(Config::pop().on_completion(completion)), None);
    assert_eq!(flow.active_destinations(), before.as_slice());
    assert_eq!(current_type(&flow), Some(Screen::Home));
    assert_eq!(*log.lock().unwrap(), vec![false]);
}

#[test]
fn test_pop_records_presentation_on_navigator() {
    let mut flow = create_stack_flow();
    let main = flow.root_destination_id().unwrap();
    flow.present_destination(Config::push(Screen::Detail));

    let pop = Config::pop();
    let pop_id = pop.id;
    flow.present_destination(pop);

    let stack = flow.destination(main).and_then(|d| d.group()).and_then(|g| g.as_stack()).unwrap();
    assert_eq!(stack.navigator().current_presentation_id(), Some(pop_id));
    assert_eq!(stack.len(), 1);
}

#[test]
fn test_replace_current_in_stack() {
    let mut flow = create_stack_flow();
    let main = flow.root_destination_id().unwrap();
    let home = flow.current_destination_id().unwrap();
    flow.present_destination(Config::push(Screen::Detail));

    let settings = flow.present_destination(Config::replace_current(Screen::Settings)).unwrap();
    assert_eq!(group_types(&flow, main), vec![Screen::Home, Screen::Settings]);
    assert_eq!(flow.current_destination_id(), Some(settings));
    assert!(flow.is_active(home));
    assert!(find(&flow, Screen::Detail).is_none());
    assert_graph_invariants(&flow);
}

#[test]
fn test_replace_root() {
    let mut flow = create_stack_flow();
    let main = flow.root_destination_id().unwrap();
    flow.set_current_destination(main).unwrap();

    let tabs = flow.present_destination(Config::replace_current(Screen::Tabs));
    assert_eq!(flow.root_destination_id(), tabs);
    assert!(flow.destination(main).is_none());
    assert!(!active_types(&flow).contains(&Screen::Main));
    assert_eq!(current_type(&flow), Some(Screen::Home));
    assert_graph_invariants(&flow);
}

#[test]
fn test_add_to_current() {
    let mut flow = create_stack_flow();
    let home = flow.current_destination_id().unwrap();

    let child = flow.present_destination(Config::add_to_current(Screen::Detail)).unwrap();
    assert_eq!(flow.destination(child).unwrap().parent_id(), Some(home));
    assert_eq!(flow.current_destination_id(), Some(child));

    // Adding to a stack pushes.
    let main = flow.root_destination_id().unwrap();
    flow.set_current_destination(main).unwrap();
    let pushed = flow.present_destination(Config::add_to_current(Screen::Settings)).unwrap();
    assert_eq!(group_types(&flow, main), vec![Screen::Home, Screen::Settings]);
    assert_eq!(flow.current_destination_id(), Some(pushed));
    assert_graph_invariants(&flow);
}

#[test]
fn test_set_as_current_false_keeps_focus() {
    let mut flow = create_stack_flow();
    let home = flow.current_destination_id();

    let child = flow
        .present_destination(Config::add_to_current(Screen::Detail).set_as_current(false))
        .unwrap();
    assert!(flow.is_active(child));
    assert_eq!(flow.current_destination_id(), home);
}

#[test]
fn test_remove_top_of_stack() {
    let mut flow = create_stack_flow();
    let main = flow.root_destination_id().unwrap();
    let b = flow.present_destination(Config::push(Screen::Detail)).unwrap();
    let c = flow.present_destination(Config::push(Screen::Settings)).unwrap();

    assert!(flow.remove_destination(c));
    assert_eq!(group_types(&flow, main), vec![Screen::Home, Screen::Detail]);
    let stack = flow.destination(main).and_then(|d| d.group()).unwrap();
    assert_eq!(stack.current_child(), Some(b));
    // Nothing is promoted in the flow itself.
    assert_eq!(flow.current_destination_id(), None);
    assert!(!flow.remove_destination(c));
    assert_graph_invariants(&flow);
}

#[test]
fn test_remove_cascades() {
    let mut flow = create_stack_flow();
    let main = flow.root_destination_id().unwrap();
    flow.present_destination(Config::push(Screen::Detail));
    flow.present_destination(Config::sheet(Screen::Sheet));
    assert_eq!(flow.active_destinations().len(), 4);

    assert!(flow.remove_destination(main));
    assert!(flow.active_destinations().is_empty());
    assert!(flow.registry().is_empty());
    assert!(flow.root_destination_id().is_none());
    assert!(flow.current_destination_id().is_none());
}

#[test]
fn test_remove_subtree_only() {
    let mut flow = create_tab_flow();
    let list_stack = find(&flow, Screen::ListStack).unwrap();
    let list = find(&flow, Screen::List).unwrap();

    assert!(flow.remove_destination(list_stack));
    assert!(!flow.is_active(list));
    assert!(flow.destination(list).is_none());
    assert!(find(&flow, Screen::HomeStack).is_some());
    assert_eq!(current_type(&flow), Some(Screen::Home));

    let tabs = flow.root_destination_id().unwrap();
    let group = flow.destination(tabs).and_then(|d| d.group()).and_then(|g| g.as_tabs()).unwrap();
    assert_eq!(group.root_for(&Tab::List), Ok(None));
    assert_graph_invariants(&flow);
}

#[test]
fn test_update_active_destinations() {
    let mut flow = create_stack_flow();
    let home = flow.current_destination_id().unwrap();
    assert!(!flow.update_active_destinations(home));
    assert!(!flow.update_active_destinations(DestinationId::new()));
}

#[test]
fn test_present_tab_selects_and_pushes() {
    let mut flow = create_tab_flow();
    let tabs = flow.root_destination_id().unwrap();
    let selected = |flow: &Flow<AppRoutes>| {
        flow.destination(tabs)
            .and_then(|d| d.group())
            .and_then(|g| g.as_tabs())
            .map(|g| *g.selected_tab())
    };
    assert_eq!(selected(&flow), Some(Tab::Home));

    let detail = flow.present_destination(Config::present_tab(Screen::Detail, Tab::List));
    assert_eq!(selected(&flow), Some(Tab::List));
    assert_eq!(flow.current_destination_id(), detail);
    assert_eq!(flow.current_destination_for_tab(&Tab::List), detail);
    let list_stack = find(&flow, Screen::ListStack).unwrap();
    assert_eq!(group_types(&flow, list_stack), vec![Screen::List, Screen::Detail]);

    // The other tab keeps its own state.
    assert_eq!(flow.current_destination_for_tab(&Tab::Home), find(&flow, Screen::Home));
    assert_graph_invariants(&flow);
}

#[test]
fn test_present_tab_in_background() {
    let mut flow = create_tab_flow();
    let home = flow.current_destination_id();

    let detail = flow
        .present_destination(Config::present_tab(Screen::Detail, Tab::List).set_as_current(false))
        .unwrap();
    assert!(flow.is_active(detail));
    assert_eq!(flow.current_destination_id(), home);
    assert_eq!(flow.current_destination_for_tab(&Tab::List), Some(detail));
}

#[test]
fn test_select_tab_switches_without_building() {
    let mut flow = create_tab_flow();
    let registered = flow.registry().len();
    let list = find(&flow, Screen::List);

    let revealed = flow.present_destination(Config::select_tab(Tab::List));
    assert_eq!(revealed, find(&flow, Screen::ListStack));
    assert_eq!(flow.current_destination_id(), list);
    assert_eq!(flow.registry().len(), registered);

    // An empty tab focuses the tab set itself.
    flow.present_destination(Config::select_tab(Tab::Profile));
    assert_eq!(flow.current_destination_id(), flow.root_destination_id());
    assert_eq!(flow.current_destination_for_tab(&Tab::Profile), None);
    assert_graph_invariants(&flow);
}

#[test]
fn test_present_into_empty_tab() {
    let mut flow = create_tab_flow();
    let settings = flow
        .present_destination(Config::present_tab(Screen::Settings, Tab::Profile))
        .unwrap();
    assert_eq!(flow.current_destination_id(), Some(settings));
    assert_eq!(flow.current_destination_for_tab(&Tab::Profile), Some(settings));

    // Replacing a plain tab root swaps it out.
    let detail = flow
        .present_destination(Config::present_tab(Screen::Detail, Tab::Profile))
        .unwrap();
    assert!(flow.destination(settings).is_none());
    assert_eq!(flow.current_destination_for_tab(&Tab::Profile), Some(detail));
}

#[test]
fn test_select_tab_with_destination_forces_selection() {
    let mut flow = create_tab_flow();
    let request = Config::new(PresentationType::SelectTab(Tab::List))
        .destination(Screen::Detail)
        .set_as_current(false);
    let detail = flow.present_destination(request);
    assert_eq!(flow.current_destination_id(), detail);
    assert_eq!(flow.current_destination_for_tab(&Tab::List), detail);
}

#[test]
fn test_tab_request_without_tab_set_fails() {
    let mut flow = create_stack_flow();
    let before = flow.registry().len();
    assert_eq!(flow.present_destination(Config::present_tab(Screen::Detail, Tab::List)), None);
    assert_eq!(flow.registry().len(), before);
}

#[test]
fn test_set_current_destination_reveals_tab() {
    let mut flow = create_tab_flow();
    let list = find(&flow, Screen::List).unwrap();
    flow.set_current_destination(list).unwrap();

    let tabs = flow.root_destination_id().unwrap();
    let group = flow.destination(tabs).and_then(|d| d.group()).and_then(|g| g.as_tabs()).unwrap();
    assert_eq!(group.selected_tab(), &Tab::List);
    assert!(flow.set_current_destination(DestinationId::new()).is_err());
}

#[test]
fn test_sheet_present_and_dismiss() {
    let mut flow = create_stack_flow();
    let home = flow.current_destination_id().unwrap();

    let sheet = flow.present_destination(Config::sheet(Screen::Sheet)).unwrap();
    assert_eq!(flow.destination(home).unwrap().presented_sheet(), Some(sheet));
    assert_eq!(flow.destination(sheet).unwrap().parent_id(), Some(home));
    assert_eq!(flow.current_destination_id(), Some(sheet));
    assert_eq!(flow.registry().sheet_presenter(sheet), Some(home));

    let revealed = flow.present_destination(Config::dismiss_sheet());
    assert_eq!(revealed, Some(home));
    assert_eq!(flow.current_destination_id(), Some(home));
    assert!(flow.destination(home).unwrap().presented_sheet().is_none());
    assert!(flow.destination(sheet).is_none());
    assert_graph_invariants(&flow);
}

#[test]
fn test_nested_sheets_dismiss_innermost() {
    let mut flow = create_stack_flow();
    let outer = flow.present_destination(Config::sheet(Screen::Sheet)).unwrap();
    let inner = flow.present_destination(Config::sheet(Screen::Settings)).unwrap();

    flow.present_destination(Config::dismiss_sheet());
    assert!(flow.destination(inner).is_none());
    assert_eq!(flow.current_destination_id(), Some(outer));

    flow.present_destination(Config::dismiss_sheet());
    assert!(flow.destination(outer).is_none());
    assert_eq!(current_type(&flow), Some(Screen::Home));
}

#[test]
fn test_dismiss_without_sheet_fails() {
    let (log, completion) = completion_log();
    let mut flow = create_stack_flow();
    assert_eq!(flow.present_destination(Config::dismiss_sheet().on_completion(completion)), None);
    assert_eq!(*log.lock().unwrap(), vec![false]);
}

#[test]
fn test_new_sheet_replaces_old() {
    let mut flow = create_stack_flow();
    let home = flow.current_destination_id().unwrap();
    let first = flow.present_destination(Config::sheet(Screen::Sheet)).unwrap();
    flow.set_current_destination(home).unwrap();

    let second = flow.present_destination(Config::sheet(Screen::Settings)).unwrap();
    assert!(flow.destination(first).is_none());
    assert_eq!(flow.destination(home).unwrap().presented_sheet(), Some(second));
}

#[test]
fn test_replace_sheet_presented_by_group() {
    let (log, completion) = completion_log();
    let mut flow = create_tab_flow();
    let tabs = flow.root_destination_id().unwrap();
    flow.present_destination(Config::select_tab(Tab::Profile));
    assert_eq!(flow.current_destination_id(), Some(tabs));
    let sheet = flow.present_destination(Config::sheet(Screen::Sheet)).unwrap();

    let settings = flow
        .present_destination(Config::replace_current(Screen::Settings).on_completion(completion))
        .unwrap();
    assert_eq!(*log.lock().unwrap(), vec![true]);
    assert!(flow.destination(sheet).is_none());
    assert_eq!(flow.destination(tabs).unwrap().presented_sheet(), Some(settings));
    assert_eq!(flow.registry().sheet_presenter(settings), Some(tabs));
    assert_eq!(flow.current_destination_id(), Some(settings));
    assert_graph_invariants(&flow);
}

#[test]
fn test_pop_does_not_reach_behind_sheet() {
    let (log, completion) = completion_log();
    let mut flow = create_stack_flow();
    let main = flow.root_destination_id().unwrap();
    let detail = flow.present_destination(Config::push(Screen::Detail)).unwrap();
    let sheet = flow.present_destination(Config::sheet(Screen::Sheet)).unwrap();

    assert_eq!(flow.present_destination(Config::pop().on_completion(completion)), None);
    assert_eq!(*log.lock().unwrap(), vec![false]);
    assert!(flow.is_active(detail));
    assert!(flow.is_active(sheet));
    assert_eq!(group_types(&flow, main), vec![Screen::Home, Screen::Detail]);
    assert_eq!(flow.current_destination_id(), Some(sheet));
}

#[test]
fn test_push_does_not_reach_behind_sheet() {
    let mut flow = create_stack_flow();
    let main = flow.root_destination_id().unwrap();
    let home = flow.current_destination_id().unwrap();
    let sheet = flow.present_destination(Config::sheet(Screen::Sheet)).unwrap();

    assert_eq!(flow.present_destination(Config::push(Screen::Detail)), None);
    assert_eq!(group_types(&flow, main), vec![Screen::Home]);
    assert_eq!(flow.destination(home).unwrap().presented_sheet(), Some(sheet));
    assert_eq!(flow.current_destination_id(), Some(sheet));
    assert_graph_invariants(&flow);
}

#[test]
fn test_push_inside_stack_sheet() {
    let mut flow = create_stack_flow();
    let main = flow.root_destination_id().unwrap();
    let sheet_stack = flow.present_destination(Config::sheet(Screen::Main)).unwrap();
    assert_eq!(current_type(&flow), Some(Screen::Home));

    let detail = flow.present_destination(Config::push(Screen::Detail)).unwrap();
    assert_eq!(group_types(&flow, sheet_stack), vec![Screen::Home, Screen::Detail]);
    assert_eq!(group_types(&flow, main), vec![Screen::Home]);
    assert_eq!(flow.current_destination_id(), Some(detail));

    flow.present_destination(Config::pop());
    assert_eq!(group_types(&flow, sheet_stack), vec![Screen::Home]);
    assert!(flow.is_active(sheet_stack));
    assert_graph_invariants(&flow);
}

#[test]
fn test_present_in_columns() {
    let mut flow = create_split_flow();
    let split = flow.root_destination_id().unwrap();
    assert_eq!(current_type(&flow), Some(Screen::Sidebar));

    let detail = flow
        .present_destination(Config::column(Screen::Detail, SplitColumn::Detail))
        .unwrap();
    let columns = flow.destination(split).and_then(|d| d.group()).and_then(|g| g.as_columns()).unwrap();
    assert_eq!(columns.root_for(SplitColumn::Detail), Ok(Some(detail)));
    assert_eq!(columns.focused_column(), Some(SplitColumn::Detail));
    assert_eq!(flow.current_destination_id(), Some(detail));

    // The content column holds a stack, so presenting there pushes onto it.
    let item = flow
        .present_destination(Config::column(Screen::Settings, SplitColumn::Content))
        .unwrap();
    let content = find(&flow, Screen::Content).unwrap();
    assert_eq!(group_types(&flow, content), vec![Screen::Settings]);
    assert_eq!(flow.current_destination_id(), Some(item));
    let columns = flow.destination(split).and_then(|d| d.group()).and_then(|g| g.as_columns()).unwrap();
    assert_eq!(columns.focused_column(), Some(SplitColumn::Content));

    // A plain column root is replaced.
    let replacement = flow
        .present_destination(Config::column(Screen::Sheet, SplitColumn::Detail))
        .unwrap();
    assert!(flow.destination(detail).is_none());
    assert!(flow.is_active(replacement));
    assert_graph_invariants(&flow);
}

#[test]
fn test_column_request_without_split_fails() {
    let mut flow = create_stack_flow();
    let before = flow.registry().len();
    assert_eq!(flow.present_destination(Config::column(Screen::Detail, SplitColumn::Detail)), None);
    assert_eq!(flow.registry().len(), before);
}

#[test]
fn test_delayed_completion_is_at_most_once() {
    let (log, completion) = completion_log();
    let mut flow = create_stack_flow();
    let request = Config::push(Screen::Detail).delay_completion(true).on_completion(completion);
    let presentation_id = request.id;

    let detail = flow.present_destination(request).unwrap();
    assert!(flow.is_pending(presentation_id));
    assert!(!flow.is_active(detail));
    assert_eq!(current_type(&flow), Some(Screen::Home));
    assert!(log.lock().unwrap().is_empty());

    assert!(flow.activate_completion_closure(detail, presentation_id, true, false));
    assert!(flow.is_active(detail));
    assert_eq!(flow.current_destination_id(), Some(detail));
    assert!(!flow.activate_completion_closure(detail, presentation_id, true, false));
    assert!(!flow.activate_completion_closure(detail, presentation_id, false, false));
    assert_eq!(*log.lock().unwrap(), vec![true]);
}

#[test]
fn test_failed_completion_removes_built() {
    let (log, completion) = completion_log();
    let mut flow = create_stack_flow();
    let before = flow.registry().len();
    let request = Config::push(Screen::Detail).delay_completion(true).on_completion(completion);
    let presentation_id = request.id;
    let detail = flow.present_destination(request).unwrap();
    assert_eq!(flow.registry().len(), before + 1);

    assert!(flow.activate_completion_closure(detail, presentation_id, false, false));
    assert!(flow.destination(detail).is_none());
    assert_eq!(flow.registry().len(), before);
    assert_eq!(current_type(&flow), Some(Screen::Home));
    assert_eq!(*log.lock().unwrap(), vec![false]);
}

#[test]
fn test_completion_for_unrelated_destination_is_ignored() {
    let mut flow = create_stack_flow();
    let request = Config::push(Screen::Detail).delay_completion(true);
    let presentation_id = request.id;
    flow.present_destination(request);

    assert!(!flow.activate_completion_closure(DestinationId::new(), presentation_id, true, false));
    assert!(flow.is_pending(presentation_id));
    assert!(!flow.activate_completion_closure(DestinationId::new(), PresentationId::new(), true, false));
}

#[test]
fn test_completion_must_agree_on_system_navigation() {
    let mut flow = create_stack_flow();
    let request = Config::push(Screen::Detail).delay_completion(true);
    let presentation_id = request.id;
    let detail = flow.present_destination(request).unwrap();

    assert!(!flow.activate_completion_closure(detail, presentation_id, true, true));
    assert!(flow.is_pending(presentation_id));
    assert!(!flow.is_active(detail));

    assert!(flow.activate_completion_closure(detail, presentation_id, true, false));
    assert!(flow.is_active(detail));
}

#[test]
fn test_rejected_transition_rolls_back() {
    let (log, completion) = completion_log();
    let mut flow = flow_builder().with_adapter(RejectingAdapter).build();
    let request = Config::replace_current(Screen::Main).on_completion(completion);

    assert_eq!(flow.present_destination(request), None);
    assert!(flow.registry().is_empty());
    assert!(flow.root_destination_id().is_none());
    assert_eq!(*log.lock().unwrap(), vec![false]);
}

#[test]
fn test_deferring_adapter_records_transitions() {
    let adapter = RecordingAdapter::deferring();
    let mut flow = start(
        flow_builder()
            .with_adapter(adapter.clone())
            .start_with(Config::replace_current(Screen::Main)),
    );
    assert!(flow.root_destination_id().is_none());
    assert_eq!(flow.pending_presentations().len(), 1);

    complete_next(&mut flow, true);
    assert_eq!(current_type(&flow), Some(Screen::Home));

    flow.present_destination(Config::push(Screen::Detail));
    flow.present_destination(Config::push(Screen::Settings));
    let pending = flow.pending_presentations();
    assert_eq!(pending.len(), 2);
    let first = flow.pending_transition(pending[0]).unwrap();
    assert_eq!(first.destination_type, Some(Screen::Detail));

    complete_next(&mut flow, true);
    complete_next(&mut flow, true);
    assert_eq!(current_type(&flow), Some(Screen::Settings));
    assert_eq!(
        adapter.kinds(),
        vec![
            PresentationKind::ReplaceCurrent,
            PresentationKind::PushInStack,
            PresentationKind::PushInStack
        ]
    );
}

#[test]
fn test_transition_signal_resolves() {
    let mut flow = create_stack_flow();
    let request = Config::push(Screen::Detail).delay_completion(true);
    let presentation_id = request.id;
    let mut signal = flow.transition_signal(presentation_id);

    let detail = flow.present_destination(request).unwrap();
    assert!(signal.try_recv().is_err());

    flow.activate_completion_closure(detail, presentation_id, true, false);
    assert_eq!(tokio_test::block_on(signal), Ok(true));
}

#[tokio::test]
async fn test_transition_signal_reports_failure() {
    let mut flow = create_stack_flow();
    let request = Config::pop();
    let signal = flow.transition_signal(request.id);
    flow.present_destination(request);
    assert_eq!(signal.await, Ok(false));
}

#[test]
fn test_dropped_signals_are_pruned() {
    let mut flow = create_stack_flow();
    drop(flow.transition_signal(PresentationId::new()));

    let request = Config::push(Screen::Detail).delay_completion(true);
    let presentation_id = request.id;
    let mut signal = flow.transition_signal(presentation_id);
    assert_eq!(flow.waiting_signals(), 1);

    flow.present_destination(request);
    complete_next(&mut flow, true);
    assert_eq!(flow.waiting_signals(), 0);
    assert_eq!(signal.try_recv(), Ok(true));
}

#[test]
fn test_system_navigation_waits_for_activation() {
    let mut flow = create_stack_flow();
    let detail = flow.present_destination(Config::push(Screen::Detail)).unwrap();
    assert!(flow
        .destination(detail)
        .unwrap()
        .has_system_navigation_action(SystemNavigationType::NavigateBackInStack));

    let presentation_id = flow
        .perform_system_navigation(detail, SystemNavigationType::NavigateBackInStack, SystemNavigationOptions::default())
        .unwrap();
    assert!(flow.is_pending(presentation_id));
    assert!(flow.destination(detail).unwrap().is_system_navigating());
    assert_eq!(flow.current_destination_id(), Some(detail));

    assert!(flow.activate_completion_closure(detail, presentation_id, true, true));
    assert!(flow.destination(detail).is_none());
    assert_eq!(current_type(&flow), Some(Screen::Home));
}

#[test]
fn test_cancelled_system_navigation_clears_flag() {
    let mut flow = create_stack_flow();
    let detail = flow.present_destination(Config::push(Screen::Detail)).unwrap();
    let presentation_id = flow
        .perform_system_navigation(detail, SystemNavigationType::NavigateBackInStack, SystemNavigationOptions::default())
        .unwrap();

    flow.activate_completion_closure(detail, presentation_id, false, true);
    let destination = flow.destination(detail).unwrap();
    assert!(!destination.is_system_navigating());
    assert!(flow.is_active(detail));
}

#[test]
fn test_immediate_system_navigation() {
    let options = FlowOptions::from_json(r#"{ "delay_system_navigation": false }"#).unwrap();
    let mut flow = start(
        flow_builder()
            .with_options(options)
            .with_logger(NavigationLogger::disabled())
            .start_with(Config::replace_current(Screen::Main)),
    );
    let home = flow.current_destination_id().unwrap();
    let sheet = flow.present_destination(Config::sheet(Screen::Sheet)).unwrap();

    let presentation_id = flow
        .perform_system_navigation(sheet, SystemNavigationType::DismissSheet, SystemNavigationOptions::default())
        .unwrap();
    assert!(!flow.is_pending(presentation_id));
    assert!(flow.destination(sheet).is_none());
    assert_eq!(flow.current_destination_id(), Some(home));
}

#[test]
fn test_system_navigation_can_opt_out_of_delay() {
    let mut flow = create_stack_flow();
    let detail = flow.present_destination(Config::push(Screen::Detail)).unwrap();
    let options = SystemNavigationOptions {
        target: None,
        delay_completion: Some(false),
    };
    // The flow-wide option still holds the request.
    let presentation_id = flow
        .perform_system_navigation(detail, SystemNavigationType::NavigateBackInStack, options)
        .unwrap();
    assert!(flow.is_pending(presentation_id));
}

#[test]
fn test_interface_action_presents_copies() {
    let mut flow = create_stack_flow();
    let home = flow.current_destination_id().unwrap();
    flow.destination_mut(home)
        .unwrap()
        .add_interface_action(Action::presentation("open", Config::push(Screen::Detail)))
        .unwrap();

    let first = flow.perform_interface_action(home, &"open", Some("1".to_string())).unwrap().unwrap();
    flow.present_destination(Config::pop());

    let second = flow.perform_interface_action(home, &"open", Some("2".to_string())).unwrap().unwrap();
    assert_ne!(first, second);
    assert!(flow.destination(first).is_none());
    assert_eq!(flow.destination(second).unwrap().content().map(String::as_str), Some("2"));
    assert_eq!(flow.current_destination_id(), Some(second));

    let missing = flow.perform_interface_action(home, &"unknown", None);
    assert!(matches!(missing, Err(NavigationError::MissingInterfaceAction(_))));
    let gone = flow.perform_interface_action(DestinationId::new(), &"open", None);
    assert!(matches!(gone, Err(NavigationError::DestinationNotFound(_))));
}

#[test]
fn test_custom_presentation() {
    let mut flow = create_stack_flow();
    let home = flow.current_destination_id().unwrap();

    let settings = flow
        .present_destination(Config::custom(Some(Screen::Settings), Arc::new(adopt_under_current)))
        .unwrap();
    assert_eq!(flow.destination(settings).unwrap().parent_id(), Some(home));
    assert!(flow.is_active(settings));
    assert_eq!(flow.current_destination_id(), Some(settings));
    assert_graph_invariants(&flow);
}

#[test]
fn test_rejected_custom_presentation() {
    let (log, completion) = completion_log();
    let mut flow = create_stack_flow();
    let before = flow.registry().len();

    let result = flow.present_destination(
        Config::custom(Some(Screen::Settings), Arc::new(refuse)).on_completion(completion),
    );
    assert_eq!(result, None);
    assert_eq!(flow.registry().len(), before);
    assert_eq!(*log.lock().unwrap(), vec![false]);
}

#[test]
fn test_reused_configuration_gets_fresh_id() {
    let mut flow = create_stack_flow();
    let request = Config::push(Screen::Detail).delay_completion(true);
    let first = flow.present_destination(request.clone()).unwrap();
    let second = flow.present_destination(request.clone()).unwrap();
    assert_ne!(first, second);

    let pending = flow.pending_presentations();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0], request.id);
    assert_ne!(pending[1], request.id);
}

#[test]
fn test_invariants_hold_through_mixed_navigation() {
    let mut flow = create_tab_flow();
    let steps = vec![
        Config::push(Screen::Detail),
        Config::sheet(Screen::Sheet),
        Config::present_tab(Screen::Settings, Tab::List),
        Config::select_tab(Tab::Home),
        Config::dismiss_sheet(),
        Config::pop(),
        Config::select_tab(Tab::Profile),
        Config::present_tab(Screen::Detail, Tab::Profile),
    ];
    for step in steps {
        flow.present_destination(step);
        assert_graph_invariants(&flow);
    }
    assert_eq!(current_type(&flow), Some(Screen::Detail));
    assert_eq!(flow.current_destination_for_tab(&Tab::Home), find(&flow, Screen::Home));
}
