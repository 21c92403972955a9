//! Common test utilities for building routes, providers and flows.
use navflow::prelude::*;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Main,
    Tabs,
    Split,
    HomeStack,
    ListStack,
    Home,
    List,
    Detail,
    Settings,
    Sheet,
    Sidebar,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Home,
    List,
    Profile,
}

#[derive(Debug, Clone)]
pub struct AppRoutes;

impl Routing for AppRoutes {
    type DestinationType = Screen;
    type ContentType = String;
    type InteractionType = &'static str;
    type TabType = Tab;
    type InteractorType = &'static str;
}

#[allow(dead_code)]
pub type Config = PresentationConfiguration<AppRoutes>;

#[allow(dead_code)]
pub type Action = InterfaceAction<AppRoutes>;

type Built = std::result::Result<Destination<AppRoutes>, NavigationError>;

/// A stack with `Home` as its root.
#[allow(dead_code)]
pub fn build_main(_: &Config, logger: &NavigationLogger) -> Built {
    Ok(Destination::stack(Screen::Main, logger.clone())
        .with_child(ChildSlot::Stack, Destination::new(Screen::Home, logger.clone())))
}

/// Three tabs: `Home` and `List` each hold a stack with one screen, `Profile` starts empty.
#[allow(dead_code)]
pub fn build_tabs(_: &Config, logger: &NavigationLogger) -> Built {
    let tabs = TabGroup::new(vec![Tab::Home, Tab::List, Tab::Profile], Tab::Home)?;
    let home = Destination::stack(Screen::HomeStack, logger.clone())
        .with_child(ChildSlot::Stack, Destination::new(Screen::Home, logger.clone()));
    let list = Destination::stack(Screen::ListStack, logger.clone())
        .with_child(ChildSlot::Stack, Destination::new(Screen::List, logger.clone()));
    Ok(Destination::tabs(Screen::Tabs, tabs, logger.clone())
        .with_child(ChildSlot::Tab(Tab::Home), home)
        .with_child(ChildSlot::Tab(Tab::List), list))
}

/// A three-column split with a plain sidebar, a stack in the content column and no detail.
#[allow(dead_code)]
pub fn build_split(_: &Config, logger: &NavigationLogger) -> Built {
    Ok(Destination::columns(Screen::Split, ColumnGroup::three_column(), logger.clone())
        .with_child(
            ChildSlot::Column(SplitColumn::Sidebar),
            Destination::new(Screen::Sidebar, logger.clone()),
        )
        .with_child(
            ChildSlot::Column(SplitColumn::Content),
            Destination::stack(Screen::Content, logger.clone()),
        ))
}

/// A builder with every test provider registered and `ViewProvider` as fallback.
#[allow(dead_code)]
pub fn flow_builder() -> FlowBuilder<AppRoutes> {
    Flow::builder()
        .with_provider(Screen::Main, build_main)
        .with_provider(Screen::Tabs, build_tabs)
        .with_provider(Screen::Split, build_split)
        .with_fallback_provider(ViewProvider)
        .with_logger(NavigationLogger::disabled())
}

/// A started flow whose root is `Main` and whose current destination is `Home`.
#[allow(dead_code)]
pub fn create_stack_flow() -> Flow<AppRoutes> {
    start(flow_builder().start_with(Config::replace_current(Screen::Main)))
}

/// A started flow rooted in the tab set, with the `Home` tab selected.
#[allow(dead_code)]
pub fn create_tab_flow() -> Flow<AppRoutes> {
    start(flow_builder().start_with(Config::replace_current(Screen::Tabs)))
}

/// A started flow rooted in the split view, focused on the sidebar.
#[allow(dead_code)]
pub fn create_split_flow() -> Flow<AppRoutes> {
    start(flow_builder().start_with(Config::replace_current(Screen::Split)))
}

#[allow(dead_code)]
pub fn start(builder: FlowBuilder<AppRoutes>) -> Flow<AppRoutes> {
    let mut flow = builder.build();
    flow.start();
    flow
}

#[allow(dead_code)]
pub fn type_of(flow: &Flow<AppRoutes>, id: DestinationId) -> Option<Screen> {
    flow.destination(id).map(|destination| *destination.destination_type())
}

#[allow(dead_code)]
pub fn current_type(flow: &Flow<AppRoutes>) -> Option<Screen> {
    flow.current_destination().map(|destination| *destination.destination_type())
}

/// The most recently activated destination of `screen`.
#[allow(dead_code)]
pub fn find(flow: &Flow<AppRoutes>, screen: Screen) -> Option<DestinationId> {
    flow.active_destinations()
        .iter()
        .rev()
        .copied()
        .find(|id| type_of(flow, *id) == Some(screen))
}

#[allow(dead_code)]
pub fn active_types(flow: &Flow<AppRoutes>) -> Vec<Screen> {
    flow.active_destinations()
        .iter()
        .filter_map(|id| type_of(flow, *id))
        .collect()
}

/// Children of a group destination, by type.
#[allow(dead_code)]
pub fn group_types(flow: &Flow<AppRoutes>, id: DestinationId) -> Vec<Screen> {
    flow.destination(id)
        .and_then(|destination| destination.group())
        .map(|group| group.children().iter().filter_map(|child| type_of(flow, *child)).collect())
        .unwrap_or_default()
}

/// Completes the oldest pending presentation and returns the destination its transition targeted.
#[allow(dead_code)]
pub fn complete_next(flow: &mut Flow<AppRoutes>, success: bool) -> Option<DestinationId> {
    let presentation_id = flow.pending_presentations().first().copied()?;
    let transition = flow.pending_transition(presentation_id)?;
    let destination = transition.target.or(transition.source).or(transition.host)?;
    flow.activate_completion_closure(
        destination,
        presentation_id,
        success,
        transition.action_type.is_system_navigation(),
    );
    transition.target
}

/// Records every completion result a configuration reports.
#[allow(dead_code)]
pub fn completion_log() -> (Arc<Mutex<Vec<bool>>>, impl Fn(bool) + Send + Sync + 'static) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    (log, move |success| sink.lock().unwrap().push(success))
}

/// Checks the structural guarantees every settled flow keeps.
#[allow(dead_code)]
pub fn assert_graph_invariants(flow: &Flow<AppRoutes>) {
    for id in flow.active_destinations() {
        let destination = flow
            .destination(*id)
            .unwrap_or_else(|| panic!("active destination {} is not registered", id));
        if let Some(parent) = destination.parent_id() {
            assert!(flow.is_active(parent), "parent of active {} is inactive", id);
        }
        if let Some(group) = destination.group() {
            if let Some(child) = group.current_child() {
                assert!(group.children().contains(&child), "focus of {} is not a child", id);
            }
        }
    }
    if let Some(current) = flow.current_destination_id() {
        assert!(flow.is_active(current), "current destination is inactive");
    }
    if let Some(root) = flow.root_destination_id() {
        assert!(flow.destination(root).is_some_and(|d| d.parent_id().is_none()));
    }
}

/// Reports every transition as failed.
#[allow(dead_code)]
pub struct RejectingAdapter;

impl PresentationAdapter<AppRoutes> for RejectingAdapter {
    fn perform_transition(&mut self, _transition: &Transition<AppRoutes>) -> TransitionOutcome {
        TransitionOutcome::Finished(false)
    }
}

/// Puts `new` under the flow's current destination and focuses it.
#[allow(dead_code)]
pub fn adopt_under_current(
    context: &mut CustomPresentationContext<'_, AppRoutes>,
) -> std::result::Result<bool, NavigationError> {
    let (Some(target), Some(current)) = (context.target, context.current) else {
        return Ok(false);
    };
    context.registry.set_parent(target, Some(current))?;
    context.focus = Some(target);
    Ok(true)
}

#[allow(dead_code)]
pub fn refuse(_: &mut CustomPresentationContext<'_, AppRoutes>) -> std::result::Result<bool, NavigationError> {
    Ok(false)
}
