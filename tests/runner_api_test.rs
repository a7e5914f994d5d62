//! Integration tests for the runner public API.

use cairn::checks::{DependencyCheck, Gate, Installer, Probe};
use cairn::pins::Pins;
use cairn::runner::{CheckStatus, RunOptions, Sequencer};
use cairn::ui::MockUI;
use cairn::CairnError;
use std::path::Path;
use tempfile::TempDir;

fn check(name: &'static str, probe: Probe, installer: Installer) -> DependencyCheck {
    DependencyCheck {
        name,
        title: name,
        probe,
        health: None,
        version_probe: None,
        installer,
        gate: Gate::Always,
        finalize: None,
    }
}

fn test_pins() -> Pins {
    Pins::with_home(Path::new("/tmp/cairn-test-home"), true)
}

#[test]
fn public_api_accessible() {
    // Verify all public types are accessible
    let _options = RunOptions::default();
    let _status = CheckStatus::Detected;
    assert!(CheckStatus::Installed.is_install());
}

#[test]
fn synthetic_sequence_end_to_end() {
    let temp = TempDir::new().unwrap();
    let marker = temp.path().join("installed.marker");
    let pins = test_pins();

    let checks = vec![
        check(
            "present",
            Probe::command("exit 0"),
            Installer::Command("exit 1".to_string()),
        ),
        check(
            "missing",
            Probe::path(&marker),
            Installer::Command(format!("touch '{}'", marker.display())),
        ),
    ];

    let mut ui = MockUI::new();
    ui.set_default_confirm_response(true);

    let sequencer = Sequencer::new(&pins);
    let report = sequencer
        .run_checks(&checks, &mut ui, &RunOptions::default())
        .unwrap();

    assert_eq!(report.status_of("present"), Some(CheckStatus::Detected));
    assert_eq!(report.status_of("missing"), Some(CheckStatus::Installed));
    assert_eq!(report.installs(), 1);
    assert!(marker.exists());
}

#[test]
fn dry_run_never_executes() {
    let temp = TempDir::new().unwrap();
    let marker = temp.path().join("would-be-installed");
    let pins = test_pins();

    let checks = vec![check(
        "missing",
        Probe::path(&marker),
        Installer::Command(format!("touch '{}'", marker.display())),
    )];

    let mut ui = MockUI::new();
    let sequencer = Sequencer::new(&pins);
    let options = RunOptions {
        dry_run: true,
        ..Default::default()
    };

    let report = sequencer.run_checks(&checks, &mut ui, &options).unwrap();

    assert_eq!(report.status_of("missing"), Some(CheckStatus::Described));
    assert!(!marker.exists());
    assert!(ui.confirms_shown().is_empty());
}

#[test]
fn declined_consent_is_fatal() {
    let pins = test_pins();
    let checks = vec![check(
        "missing",
        Probe::command("exit 1"),
        Installer::Command("exit 0".to_string()),
    )];

    let mut ui = MockUI::new();
    let sequencer = Sequencer::new(&pins);

    let err = sequencer
        .run_checks(&checks, &mut ui, &RunOptions::default())
        .unwrap_err();

    assert!(matches!(err, CairnError::Declined { .. }));
}
