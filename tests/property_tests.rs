//! Property-based tests for the classifier and the forest invariants

use arbol::forest::{truncate_args, ProcessForest, ARGS_DISPLAY_CAP};
use arbol::parser::{LineParser, SyscallEvent};
use arbol::report;
use proptest::prelude::*;

fn event(pid: i32, timestamp: f64, name: &str, args: &str, result: Option<i32>) -> SyscallEvent {
    SyscallEvent {
        pid,
        timestamp,
        name: name.to_string(),
        args: args.to_string(),
        result,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Property: the classifier never panics and never aborts, whatever the line
    #[test]
    fn prop_parse_never_panics(line in ".*") {
        let parser = LineParser::new();
        let _ = parser.parse_line(&line);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Property: parsed call lines round their fields through intact
    #[test]
    fn prop_well_formed_lines_classify(
        pid in 1i32..100_000,
        secs in 1u32..2_000_000_000,
        micros in 0u32..1_000_000,
    ) {
        let parser = LineParser::new();
        let line = format!("{}  {}.{:06} execve(\"/bin/true\", [\"true\"], [/* 3 vars */]) = 0", pid, secs, micros);
        let event = parser.parse_line(&line).unwrap();
        prop_assert_eq!(event.pid, pid);
        prop_assert_eq!(event.name.as_str(), "execve");
        prop_assert_eq!(event.result, Some(0));
        prop_assert!((event.timestamp - (secs as f64 + micros as f64 / 1e6)).abs() < 1e-6);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Properties over one root spawning N children, each of which execs
    // and exits: time attribution, depth and child counting
    #[test]
    fn prop_forest_invariants(durations in prop::collection::vec(0.001f64..10.0, 1..20)) {
        let root = 100;
        let mut forest = ProcessForest::new();
        forest.apply(&event(root, 0.5, "execve", "/bin/build build", Some(0)));

        let mut t = 1.0;
        for (i, duration) in durations.iter().enumerate() {
            let child = 200 + i as i32;
            forest.apply(&event(root, t, "clone", "child_stack=0", Some(child)));
            forest.apply(&event(child, t + 0.0005, "execve", "/bin/step step", Some(0)));
            forest.apply(&event(child, t + duration, "exit_group", "0", None));
            t += duration + 1.0;
        }
        forest.apply(&event(root, t, "exit_group", "0", None));
        forest.finalize();

        let root_rec = forest.get(root).unwrap();
        prop_assert_eq!(root_rec.children_count as usize, durations.len());
        prop_assert_eq!(root_rec.depth, 0);

        // self-time is exactly total minus children for every closed record
        let total = root_rec.total_time.unwrap();
        prop_assert_eq!(root_rec.self_time.unwrap(), total - root_rec.children_time);

        let mut children_total = 0.0;
        for i in 0..durations.len() {
            let child = forest.get(200 + i as i32).unwrap();
            prop_assert_eq!(child.parent, Some(root));
            prop_assert_eq!(child.depth, root_rec.depth + 1);
            let child_total = child.total_time.unwrap();
            prop_assert_eq!(child.self_time.unwrap(), child_total - child.children_time);
            children_total += child_total;
        }
        prop_assert_eq!(root_rec.children_time, children_total);

        // children_count equals the number of records pointing back at root
        let pointing_back = forest.processes().filter(|p| p.parent == Some(root)).count();
        prop_assert_eq!(root_rec.children_count as usize, pointing_back);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Property: emitted rows are sorted ascending by start time and all
    // exceed the threshold
    #[test]
    fn prop_report_rows_sorted_and_filtered(
        starts in prop::collection::vec(1.0f64..1000.0, 1..15),
        threshold in 0.0f64..2.0,
    ) {
        let mut forest = ProcessForest::new();
        for (i, start) in starts.iter().enumerate() {
            let pid = 10 + i as i32;
            forest.apply(&event(pid, *start, "execve", "/bin/step step", Some(0)));
            forest.apply(&event(pid, start + 1.5, "exit_group", "0", None));
        }
        forest.finalize();

        let rows = report::collect_rows(&forest, threshold);
        for pair in rows.windows(2) {
            prop_assert!(pair[0].started <= pair[1].started);
        }
        for row in &rows {
            prop_assert!(row.total_time > threshold);
        }
        prop_assert_eq!(report::render_text(&rows), report::render_text(&rows));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Property: truncation emits at most cap chars plus the ellipsis marker
    #[test]
    fn prop_truncation_cap(args in "[a-zA-Z0-9 /_.-]{0,120}") {
        let out = truncate_args(&args, ARGS_DISPLAY_CAP);
        if args.chars().count() > ARGS_DISPLAY_CAP {
            prop_assert_eq!(out.chars().count(), ARGS_DISPLAY_CAP + 3);
            prop_assert!(out.ends_with("..."));
            let kept: String = args.chars().take(ARGS_DISPLAY_CAP).collect();
            prop_assert!(out.starts_with(&kept));
        } else {
            prop_assert_eq!(out, args);
        }
    }
}
