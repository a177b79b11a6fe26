use std::time::Duration;

use disclosure::{ActivateOptions, DisclosureConfig, ItemState, Page, TriggerKind};
use pagedom::{Element, Event, Key, Modifiers};

const KEYS: [&str; 3] = ["monthly", "yearly", "pricing"];

fn tab(key: &str) -> Element {
    Element::button()
        .id(format!("tab-{key}"))
        .attr("data-ct-tab", key)
        .text(key)
}

fn toggle(key: &str) -> Element {
    Element::button()
        .id(format!("toggle-{key}"))
        .attr("data-ct-toggle", key)
        .text(key)
}

fn panel(key: &str) -> Element {
    Element::div()
        .id(format!("panel-{key}"))
        .attr("data-ct-panel", key)
        .transition(Duration::from_millis(150))
}

fn tabs(name: &str) -> Element {
    Element::div()
        .id(format!("{name}-root"))
        .attr("data-ct", name)
        .child(
            Element::div()
                .attr("role", "tablist")
                .children(KEYS.map(tab)),
        )
        .children(KEYS.map(panel))
}

fn mount(page: &mut Page) -> Vec<String> {
    let root = page.document().root();
    page.mount_content_tabs(root, DisclosureConfig::content_tabs())
        .into_iter()
        .map(|id| id.to_string())
        .collect()
}

fn state(page: &Page, controller: &str, id: &str) -> ItemState {
    page.controller(controller)
        .and_then(|c| c.state(id))
        .expect("known item")
}

fn attr(page: &Page, element: &str, name: &str) -> Option<String> {
    let node = page.element(element)?;
    page.document().attr(node, name).map(str::to_string)
}

fn key(page: &mut Page, element: &str, key: Key) {
    let target = page.element(element);
    page.dispatch(Event::Key {
        target,
        key,
        modifiers: Modifiers::new(),
    });
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_first_panel_opens_by_default() {
    let mut page = Page::from_element(tabs("plans"));
    let ids = mount(&mut page);
    assert_eq!(ids, vec!["plans"]);

    let controller = page.controller("plans").unwrap();
    assert!(controller.is_tabs_mode());
    assert_eq!(controller.open_ids(), vec!["monthly"]);

    assert_eq!(attr(&page, "tab-monthly", "role").as_deref(), Some("tab"));
    assert_eq!(attr(&page, "tab-monthly", "aria-selected").as_deref(), Some("true"));
    assert_eq!(attr(&page, "tab-yearly", "aria-selected").as_deref(), Some("false"));
    assert_eq!(attr(&page, "panel-monthly", "role").as_deref(), Some("tabpanel"));
    assert_eq!(
        attr(&page, "panel-monthly", "aria-labelledby").as_deref(),
        Some("tab-monthly")
    );
    assert_eq!(
        attr(&page, "tab-pricing", "aria-controls").as_deref(),
        Some("panel-pricing")
    );
    assert_eq!(attr(&page, "panel-monthly", "data-state").as_deref(), Some("open"));
    assert_eq!(attr(&page, "panel-yearly", "data-state").as_deref(), Some("closed"));
    assert!(page.document().hidden(page.element("panel-yearly").unwrap()));
}

#[test]
fn test_selected_tab_is_the_tab_stop() {
    let mut page = Page::from_element(
        Element::div()
            .attr("data-ct", "plans")
            .child(tab("monthly"))
            .child(tab("yearly").attr("aria-selected", "true"))
            .children(KEYS[..2].iter().map(|k| panel(k))),
    );
    mount(&mut page);

    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["yearly"]);
    assert_eq!(attr(&page, "tab-yearly", "tabindex").as_deref(), Some("0"));
    assert_eq!(attr(&page, "tab-monthly", "tabindex").as_deref(), Some("-1"));
}

#[test]
fn test_first_visible_panel_wins_without_declaration() {
    let mut page = Page::from_element(
        Element::div()
            .attr("data-ct", "plans")
            .children(KEYS.map(tab))
            .child(panel("monthly").flag("hidden"))
            .child(panel("yearly"))
            .child(panel("pricing").flag("hidden")),
    );
    mount(&mut page);
    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["yearly"]);
}

#[test]
fn test_declared_panel_wins_over_visibility() {
    let mut page = Page::from_element(
        Element::div()
            .attr("data-ct", "plans")
            .children(KEYS.map(tab))
            .child(panel("monthly"))
            .child(panel("yearly"))
            .child(panel("pricing").flag("data-open")),
    );
    mount(&mut page);
    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["pricing"]);
}

#[test]
fn test_hash_overrides_default_open() {
    let mut page = Page::from_element(
        Element::div()
            .attr("data-ct", "plans")
            .children(KEYS.map(tab))
            .child(panel("monthly"))
            .child(panel("yearly").flag("data-open"))
            .child(panel("pricing")),
    );
    page.document_mut().set_location_hash("#ct=pricing");
    mount(&mut page);

    assert_eq!(state(&page, "plans", "pricing"), ItemState::Open);
    assert_eq!(state(&page, "plans", "yearly"), ItemState::Closed);
    assert_eq!(attr(&page, "tab-pricing", "tabindex").as_deref(), Some("0"));
}

#[test]
fn test_hash_selection_emits_change_event() {
    let mut page = Page::from_element(tabs("plans"));
    page.document_mut().set_location_hash("#ct=pricing");
    mount(&mut page);

    let events = page.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "ct:change");
    assert_eq!(events[0].get("controllerId"), Some("plans"));
    assert_eq!(events[0].get("id"), Some("pricing"));
    assert_eq!(events[0].get("open"), Some("true"));
    assert!(page.take_events().is_empty());

    // Applied without animation: nothing left to finish.
    assert!(!page.document().has_active_transitions());
}

#[test]
fn test_default_selection_emits_change_event() {
    let mut page = Page::from_element(tabs("plans"));
    mount(&mut page);

    let events = page.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].get("id"), Some("monthly"));
}

#[test]
fn test_hash_beats_initial_id() {
    let mut page = Page::from_element(tabs("plans"));
    page.document_mut().set_location_hash("#ct=pricing");
    let root = page.document().root();
    page.mount_content_tabs(root, DisclosureConfig::content_tabs().initial_id("yearly"));

    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["pricing"]);
}

#[test]
fn test_initial_id_applies_without_hash() {
    let mut page = Page::from_element(tabs("plans"));
    let root = page.document().root();
    page.mount_content_tabs(root, DisclosureConfig::content_tabs().initial_id("yearly"));

    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["yearly"]);
}

#[test]
fn test_hash_naming_unknown_panel_is_ignored() {
    let mut page = Page::from_element(tabs("plans"));
    page.document_mut().set_location_hash("ct=enterprise");
    mount(&mut page);
    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["monthly"]);
}

#[test]
fn test_hash_ignored_without_sync() {
    let mut page = Page::from_element(tabs("plans"));
    page.document_mut().set_location_hash("#ct=pricing");
    let root = page.document().root();
    page.mount_content_tabs(root, DisclosureConfig::content_tabs().sync_hash(false));
    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["monthly"]);
}

#[test]
fn test_custom_hash_pattern() {
    let mut page = Page::from_element(tabs("plans"));
    page.document_mut().set_location_hash("#plan/yearly");
    let root = page.document().root();
    page.mount_content_tabs(
        root,
        DisclosureConfig::content_tabs().hash_pattern(r"^#plan/(\w+)$"),
    );
    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["yearly"]);
}

#[test]
fn test_invalid_hash_pattern_skips_instance() {
    let mut page = Page::from_element(tabs("plans"));
    let root = page.document().root();
    let ids = page.mount_content_tabs(root, DisclosureConfig::content_tabs().hash_pattern("(("));
    assert!(ids.is_empty());
    assert!(page.controller("plans").is_none());
}

#[test]
fn test_each_root_gets_its_own_controller() {
    let mut page = Page::from_element(
        Element::div()
            .child(Element::div().id("billing").attr("data-ct", "").children([
                Element::button().attr("data-ct-tab", "card"),
                Element::button().attr("data-ct-tab", "invoice"),
                Element::div().attr("data-ct-panel", "card"),
                Element::div().attr("data-ct-panel", "invoice"),
            ]))
            .child(tabs("plans")),
    );
    let ids = mount(&mut page);
    assert_eq!(ids, vec!["billing", "plans"]);

    page.activate("billing", "invoice", ActivateOptions::default());
    assert_eq!(page.controller("billing").unwrap().open_ids(), vec!["invoice"]);
    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["monthly"]);
}

#[test]
fn test_duplicate_instance_names_keep_first() {
    let mut page = Page::from_element(
        Element::div()
            .child(tabs("plans"))
            .child(
                Element::div()
                    .attr("data-ct", "plans")
                    .child(Element::button().attr("data-ct-tab", "other"))
                    .child(Element::div().attr("data-ct-panel", "other")),
            ),
    );
    let ids = mount(&mut page);
    assert_eq!(ids, vec!["plans"]);
    assert!(page.controller("plans").unwrap().item("monthly").is_some());
}

#[test]
fn test_scope_itself_can_be_the_root() {
    let mut page = Page::from_element(tabs("plans"));
    let scope = page.element("plans-root").unwrap();
    let ids = page.mount_content_tabs(scope, DisclosureConfig::content_tabs());
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0].as_str(), "plans");
}

#[test]
fn test_keyed_markup_is_one_group_per_root() {
    let mut page = Page::from_element(
        Element::div()
            .attr("data-ct", "plans")
            .child(
                Element::div()
                    .flag("data-section")
                    .child(tab("monthly"))
                    .child(panel("monthly")),
            )
            .child(
                Element::div()
                    .flag("data-section")
                    .child(tab("yearly"))
                    .child(panel("yearly")),
            ),
    );
    let root = page.document().root();
    page.mount_content_tabs(
        root,
        DisclosureConfig::content_tabs().group_boundary("data-section"),
    );

    let controller = page.controller("plans").unwrap();
    assert_eq!(controller.groups().len(), 1);
    assert_eq!(controller.groups()[0].boundary, Some(controller.root()));
}

#[test]
fn test_broken_keys_are_skipped() {
    let mut page = Page::from_element(
        Element::div()
            .attr("data-ct", "plans")
            .child(tab("monthly"))
            .child(tab("ghost"))
            .child(panel("monthly"))
            .child(Element::div().attr("data-ct-panel", ""))
            .child(Element::div().attr("data-ct-panel", "lonely"))
            .child(Element::div().attr("data-ct-panel", "monthly")),
    );
    mount(&mut page);

    let controller = page.controller("plans").unwrap();
    let ids: Vec<&str> = controller.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["monthly"]);
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_clicking_selected_tab_does_not_collapse() {
    let mut page = Page::from_element(tabs("plans"));
    mount(&mut page);
    page.take_events();
    let target = page.element("tab-monthly").unwrap();

    page.dispatch(Event::Click { target });
    page.finish_transitions();
    assert_eq!(state(&page, "plans", "monthly"), ItemState::Open);
    assert!(page.take_events().is_empty());
}

#[test]
fn test_clicking_tab_switches_panel() {
    let mut page = Page::from_element(tabs("plans"));
    mount(&mut page);
    page.take_events();
    let target = page.element("tab-pricing").unwrap();

    page.dispatch(Event::Click { target });
    assert_eq!(state(&page, "plans", "pricing"), ItemState::Open);
    assert_eq!(state(&page, "plans", "monthly"), ItemState::Closing);
    assert_eq!(attr(&page, "tab-monthly", "aria-selected").as_deref(), Some("false"));
    assert_eq!(attr(&page, "tab-pricing", "tabindex").as_deref(), Some("0"));
    assert_eq!(page.focused(), Some(target));

    page.finish_transitions();
    assert_eq!(state(&page, "plans", "monthly"), ItemState::Closed);

    let events = page.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "ct:change");
    assert_eq!(Some(events[0].target), page.element("plans-root"));
    assert_eq!(events[0].get("controllerId"), Some("plans"));
    assert_eq!(events[0].get("id"), Some("pricing"));
}

#[test]
fn test_tabs_stay_exclusive_without_single_open() {
    let mut page = Page::from_element(tabs("plans"));
    let root = page.document().root();
    page.mount_content_tabs(root, DisclosureConfig::content_tabs().single_open(false));

    page.activate("plans", "yearly", ActivateOptions::default());
    page.activate("plans", "pricing", ActivateOptions::default());
    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["pricing"]);
}

#[test]
fn test_toggle_and_tab_share_one_item() {
    let mut page = Page::from_element(
        Element::div()
            .attr("data-ct", "plans")
            .children(KEYS.map(tab))
            .child(toggle("monthly"))
            .child(panel("monthly"))
            .child(toggle("yearly"))
            .child(panel("yearly"))
            .child(toggle("pricing"))
            .child(panel("pricing")),
    );
    mount(&mut page);

    let controller = page.controller("plans").unwrap();
    let item = controller.item("yearly").unwrap();
    assert_eq!(item.trigger_kind(item.tab.unwrap()), Some(TriggerKind::Tab));
    assert_eq!(item.trigger_kind(item.toggle.unwrap()), Some(TriggerKind::Toggle));

    let target = page.element("toggle-yearly").unwrap();
    page.dispatch(Event::Click { target });
    assert_eq!(attr(&page, "toggle-yearly", "aria-expanded").as_deref(), Some("true"));
    assert_eq!(attr(&page, "tab-yearly", "aria-selected").as_deref(), Some("true"));
    assert_eq!(attr(&page, "toggle-monthly", "aria-expanded").as_deref(), Some("false"));

    // Toggles may collapse, tabs may not.
    page.dispatch(Event::Click { target });
    page.finish_transitions();
    assert_eq!(state(&page, "plans", "yearly"), ItemState::Closed);
    assert!(page.controller("plans").unwrap().open_ids().is_empty());
}

#[test]
fn test_toggle_only_instance_follows_single_open() {
    let mut page = Page::from_element(
        Element::div()
            .attr("data-ct", "faq")
            .child(toggle("monthly"))
            .child(panel("monthly"))
            .child(toggle("yearly"))
            .child(panel("yearly")),
    );
    let root = page.document().root();
    page.mount_content_tabs(root, DisclosureConfig::content_tabs().single_open(false));

    let controller = page.controller("faq").unwrap();
    assert!(!controller.is_tabs_mode());
    assert_eq!(attr(&page, "panel-monthly", "role").as_deref(), Some("region"));

    page.activate("faq", "yearly", ActivateOptions::default());
    assert_eq!(
        page.controller("faq").unwrap().open_ids(),
        vec!["monthly", "yearly"]
    );
}

// ============================================================================
// Keyboard
// ============================================================================

#[test]
fn test_arrows_select_tabs() {
    let mut page = Page::from_element(tabs("plans"));
    mount(&mut page);

    key(&mut page, "tab-monthly", Key::Right);
    assert_eq!(page.focused(), page.element("tab-yearly"));
    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["yearly"]);

    key(&mut page, "tab-yearly", Key::End);
    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["pricing"]);

    key(&mut page, "tab-pricing", Key::Right);
    assert_eq!(page.focused(), page.element("tab-monthly"));
    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["monthly"]);
}

#[test]
fn test_manual_activation_moves_focus_only() {
    let mut page = Page::from_element(tabs("plans"));
    let root = page.document().root();
    page.mount_content_tabs(root, DisclosureConfig::content_tabs().activate_on_arrow(false));

    key(&mut page, "tab-monthly", Key::Left);
    assert_eq!(page.focused(), page.element("tab-pricing"));
    assert_eq!(attr(&page, "tab-pricing", "tabindex").as_deref(), Some("0"));
    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["monthly"]);

    key(&mut page, "tab-pricing", Key::Enter);
    assert_eq!(page.controller("plans").unwrap().open_ids(), vec!["pricing"]);
}
