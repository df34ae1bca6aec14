//! Routing of logged steps into scopes and sinks.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use scope_report::{
    Config, ExecutionContext, Section, SinkKind, Status, Step,
    sink::{Call, Recorder},
};

fn steps(rec: &Recorder) -> Vec<(String, Option<String>, Section)> {
    rec.calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::AddStep { text, screenshot, section, .. } => {
                Some((text, screenshot, section))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn steps_land_in_innermost_scope() {
    let rec = Recorder::new();
    let mut ctx =
        ExecutionContext::default().with_sink(SinkKind::Txt, rec.clone());

    let suite = ctx.start_suite("S").unwrap();
    assert_eq!(ctx.log_step("connect to grid"), Some(suite));
    let script = ctx.start_script("A").unwrap();
    assert_eq!(ctx.log_step("login"), Some(script));
    let group = ctx.start_group("G").unwrap();
    assert_eq!(ctx.log_step("open form"), Some(group));
    let case = ctx.start_test_case("tc").unwrap();
    assert_eq!(ctx.log_step("submit"), Some(case));
    _ = ctx.finish_test_case().unwrap();
    assert_eq!(ctx.log_step("close form"), Some(group));

    assert_eq!(rec.steps_of(suite), ["connect to grid"]);
    assert_eq!(rec.steps_of(script), ["login"]);
    assert_eq!(rec.steps_of(group), ["open form", "close form"]);
    assert_eq!(rec.steps_of(case), ["submit"]);
}

#[test]
fn error_steps_are_captured_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let taken = Arc::new(Mutex::new(Vec::<(PathBuf, bool)>::new()));
    let shots = Arc::clone(&taken);
    let rec = Recorder::new();
    let mut ctx = ExecutionContext::new(
        Config::default()
            .with_output_prefix(dir.path())
            .with_capture_images(true),
    )
    .with_sink(SinkKind::Html, rec.clone())
    .with_screen_capture(move |path: &Path, is_error: bool| {
        shots.lock().unwrap().push((path.to_path_buf(), is_error));
        true
    });

    _ = ctx.start_script("A").unwrap();
    let case = ctx.start_test_case("tc").unwrap();
    _ = ctx.log_step("click save");
    _ = ctx.log_step("FAIL: toast not shown");
    _ = ctx.log_step("Error: request timed out");
    let closed = ctx.finish_test_case().unwrap().unwrap();

    let shot = |n| {
        dir.path()
            .join("screenshots")
            .join(format!("{}-{n}.png", case.get()))
    };
    assert_eq!(
        *taken.lock().unwrap(),
        [(shot(1), true), (shot(2), true)],
    );
    let screenshots =
        steps(&rec).into_iter().map(|(_, s, _)| s).collect::<Vec<_>>();
    assert_eq!(
        screenshots,
        [
            None,
            Some(shot(1).display().to_string()),
            Some(shot(2).display().to_string()),
        ],
    );
    assert_eq!(closed.snapshot.status, Some(Status::Fail));
    assert_eq!(closed.snapshot.stats.errors, 2);
    assert_eq!(closed.snapshot.stats.actions, 1);
}

#[test]
fn no_capture_without_images_enabled() {
    let rec = Recorder::new();
    let mut ctx = ExecutionContext::default()
        .with_sink(SinkKind::Txt, rec.clone())
        .with_screen_capture(|_: &Path, _: bool| -> bool {
            panic!("capturing is disabled")
        });

    _ = ctx.start_script("A").unwrap();
    _ = ctx.log_step("failed to load");

    assert_eq!(steps(&rec)[0].1, None);
}

#[test]
fn custom_fail_marker() {
    let mut ctx = ExecutionContext::new(
        Config::default().with_fail_marker(r"^\[KO\]").unwrap(),
    );
    _ = ctx.start_script("A").unwrap();
    _ = ctx.start_test_case("tc").unwrap();
    _ = ctx.log_step("Error text is displayed");
    _ = ctx.log_step("[KO] wrong total");

    let closed = ctx.finish_test_case().unwrap().unwrap();
    assert_eq!(closed.snapshot.stats.errors, 1);
    assert_eq!(closed.snapshot.stats.actions, 1);
    assert_eq!(closed.snapshot.status, Some(Status::Fail));
}

#[test]
fn sections_from_probe_and_overrides() {
    let phase = Arc::new(Mutex::new(Section::Before));
    let probe = Arc::clone(&phase);
    let rec = Recorder::new();
    let mut ctx = ExecutionContext::default()
        .with_sink(SinkKind::Txt, rec.clone())
        .with_section_probe(move || *probe.lock().unwrap());

    _ = ctx.start_script("A").unwrap();
    _ = ctx.log_step("seed database");
    *phase.lock().unwrap() = Section::Current;
    _ = ctx.log_step("place order");
    _ = ctx.log_step(Step::new("drop database").in_section(Section::After));
    _ = ctx.log_step(Step::new("order page").with_screenshot("manual.png"));

    let sections = steps(&rec)
        .into_iter()
        .map(|(text, shot, section)| (text, shot.is_some(), section))
        .collect::<Vec<_>>();
    assert_eq!(
        sections,
        [
            ("seed database".to_owned(), false, Section::Before),
            ("place order".to_owned(), false, Section::Current),
            ("drop database".to_owned(), false, Section::After),
            ("order page".to_owned(), true, Section::Current),
        ],
    );
}
