use std::cell::RefCell;

use stamp_core::{
    Affordance, AnnotationHost, AnnotationState, Annotator, Cursor, FixedZone, ScanReport,
    Transition, UserSettings,
};

const NOW: i64 = 1_700_000_000;

#[derive(Debug, Clone, Default)]
struct FakeNode {
    text: String,
    input: bool,
    edit_context: bool,
    detached: bool,
    state: Option<AnnotationState>,
    cursor: Option<Cursor>,
    hover_listeners: usize,
    change_listeners: usize,
}

#[derive(Default)]
struct FakeHost {
    nodes: RefCell<Vec<FakeNode>>,
}

impl FakeHost {
    fn add(&self, node: FakeNode) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        nodes.len() - 1
    }

    fn cell(&self, text: &str) -> usize {
        self.add(FakeNode {
            text: text.to_string(),
            ..FakeNode::default()
        })
    }

    fn input(&self, text: &str) -> usize {
        self.add(FakeNode {
            text: text.to_string(),
            input: true,
            ..FakeNode::default()
        })
    }

    fn node(&self, id: usize) -> FakeNode {
        self.nodes.borrow()[id].clone()
    }

    fn set_text(&self, id: usize, text: &str) {
        self.nodes.borrow_mut()[id].text = text.to_string();
    }
}

impl AnnotationHost for FakeHost {
    type Element = usize;

    fn unprocessed_candidates(&self, _root: &usize) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        (0..nodes.len()).filter(|id| nodes[*id].state.is_none()).collect()
    }

    fn processed_elements(&self, _root: &usize) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        (0..nodes.len()).filter(|id| nodes[*id].state.is_some()).collect()
    }

    fn display_text(&self, element: &usize) -> Option<String> {
        Some(self.nodes.borrow()[*element].text.clone())
    }

    fn is_input(&self, element: &usize) -> bool {
        self.nodes.borrow()[*element].input
    }

    fn in_edit_context(&self, element: &usize) -> bool {
        self.nodes.borrow()[*element].edit_context
    }

    fn is_connected(&self, element: &usize) -> bool {
        !self.nodes.borrow()[*element].detached
    }

    fn read_state(&self, element: &usize) -> Option<AnnotationState> {
        self.nodes.borrow()[*element].state.clone()
    }

    fn write_state(&self, element: &usize, state: &AnnotationState, affordance: Affordance) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[*element].state = Some(state.clone());
        nodes[*element].cursor = Some(affordance.cursor);
    }

    fn clear_state(&self, element: &usize) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[*element].state = None;
        nodes[*element].cursor = None;
    }

    fn set_hover(&self, element: &usize, enabled: bool) {
        self.nodes.borrow_mut()[*element].hover_listeners = usize::from(enabled);
    }

    fn ensure_change_listener(&self, element: &usize) {
        self.nodes.borrow_mut()[*element].change_listeners = 1;
    }
}

fn annotator<'a>(
    host: &'a FakeHost,
    settings: &'a UserSettings,
    zone: &'a FixedZone,
) -> Annotator<'a, FakeHost> {
    Annotator::new(host, settings, zone, NOW)
}

#[test]
fn scan_annotates_timestamps_and_skips_other_text() {
    let host = FakeHost::default();
    let seconds = host.cell("1700000000");
    let millis = host.cell(" 1700000000000 ");
    let plain = host.cell("order-42");
    let empty = host.cell("");

    let settings = UserSettings::default();
    let zone = FixedZone::utc();
    let report = annotator(&host, &settings, &zone).scan(&0);

    assert_eq!(report.examined, 4);
    assert_eq!(report.annotated, 2);
    assert_eq!(report.skipped, 2);

    let mut total = ScanReport::default();
    total.merge(report);
    total.merge(report);
    assert_eq!(total.examined, 8);
    assert_eq!(total.annotated, 4);

    for id in [seconds, millis] {
        let node = host.node(id);
        let state = node.state.expect("phải được chú thích");
        assert_eq!(state.raw_timestamp, NOW);
        assert!(state.tooltip_content.contains("data-section=\"utc\""));
        assert!(!state.edit_mode);
        assert_eq!(node.cursor, Some(Cursor::Help));
        assert_eq!(node.hover_listeners, 1);
        assert_eq!(node.change_listeners, 0);
    }
    assert!(host.node(plain).state.is_none());
    assert!(host.node(empty).state.is_none());
}

#[test]
fn second_scan_of_unchanged_tree_is_a_no_op() {
    let host = FakeHost::default();
    host.cell("1700000000");
    host.input("1700000000000");

    let settings = UserSettings::default();
    let zone = FixedZone::utc();
    let engine = annotator(&host, &settings, &zone);

    engine.scan(&0);
    let before: Vec<_> = (0..2).map(|id| host.node(id)).collect();

    let report = engine.scan(&0);
    assert_eq!(report.examined, 0);

    for (id, node) in before.iter().enumerate() {
        let after = host.node(id);
        assert_eq!(after.state, node.state);
        assert_eq!(after.hover_listeners, 1);
        assert_eq!(after.change_listeners, node.change_listeners);
    }
}

#[test]
fn edit_mode_respects_tooltip_setting() {
    let host = FakeHost::default();
    let input = host.input("1700000000");
    let modal_span = host.add(FakeNode {
        text: "1700000000".to_string(),
        edit_context: true,
        ..FakeNode::default()
    });

    let settings = UserSettings {
        show_tooltip_in_edit_mode: false,
        ..UserSettings::default()
    };
    let zone = FixedZone::utc();
    annotator(&host, &settings, &zone).scan(&0);

    for id in [input, modal_span] {
        let node = host.node(id);
        assert!(node.state.as_ref().map(|s| s.edit_mode).unwrap_or(false));
        assert_eq!(node.cursor, Some(Cursor::Text));
        assert_eq!(node.hover_listeners, 0);
    }
    assert_eq!(host.node(input).change_listeners, 1);
    assert_eq!(host.node(modal_span).change_listeners, 0);

    let enabled = UserSettings::default();
    annotator(&host, &enabled, &zone).reformat(&0);
    assert_eq!(host.node(input).cursor, Some(Cursor::Help));
    assert_eq!(host.node(input).hover_listeners, 1);
}

#[test]
fn live_edit_to_non_timestamp_reverts_annotation() {
    let host = FakeHost::default();
    let input = host.input("1700000000");

    let settings = UserSettings::default();
    let zone = FixedZone::utc();
    let engine = annotator(&host, &settings, &zone);
    engine.scan(&0);

    assert_eq!(engine.refresh_element(&input), Transition::Unchanged);

    host.set_text(input, "1700000000x");
    assert_eq!(engine.refresh_element(&input), Transition::Reverted);
    let node = host.node(input);
    assert!(node.state.is_none());
    assert_eq!(node.cursor, None);
    assert_eq!(node.hover_listeners, 0);

    host.set_text(input, "");
    assert_eq!(engine.refresh_element(&input), Transition::Skipped);

    host.set_text(input, "1600000000");
    assert_eq!(
        engine.refresh_element(&input),
        Transition::Annotated(1_600_000_000)
    );
    assert_eq!(host.node(input).change_listeners, 1);
}

#[test]
fn detached_elements_are_not_written() {
    let host = FakeHost::default();
    let gone = host.add(FakeNode {
        text: "1700000000".to_string(),
        detached: true,
        ..FakeNode::default()
    });

    let settings = UserSettings::default();
    let zone = FixedZone::utc();
    let report = annotator(&host, &settings, &zone).scan(&0);

    assert_eq!(report.annotated, 0);
    assert!(host.node(gone).state.is_none());
}

#[test]
fn reformat_picks_up_new_date_format_and_clear_all_strips_everything() {
    let host = FakeHost::default();
    let cell = host.cell("1700000000");
    let zone = FixedZone::utc();

    let defaults = UserSettings::default();
    annotator(&host, &defaults, &zone).scan(&0);
    let before = host.node(cell).state.expect("đã chú thích").tooltip_content;
    assert!(before.contains("Nov 14, 2023, 22:13:20"));

    let iso = UserSettings {
        date_format: stamp_core::DateFormat::Iso,
        ..UserSettings::default()
    };
    let report = annotator(&host, &iso, &zone).reformat(&0);
    assert_eq!(report.annotated, 1);
    let after = host.node(cell).state.expect("vẫn chú thích").tooltip_content;
    assert!(after.contains("2023-11-14T22:13:20.000Z"));

    assert_eq!(annotator(&host, &iso, &zone).clear_all(&0), 1);
    assert!(host.node(cell).state.is_none());
    assert_eq!(host.node(cell).hover_listeners, 0);
}
