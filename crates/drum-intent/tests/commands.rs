use drum_intent::{
    classify, create_engine, normalize, resolve_duration_ms, resolve_number, Action, RuleId,
    Subdivision,
};

#[test]
fn two_and_three_digit_numbers_set_the_tempo() {
    for value in 10u32..=999 {
        let expected = value.clamp(40, 300);
        assert_eq!(
            classify(&value.to_string()),
            Action::SetBpm { bpm: expected },
            "value: {}",
            value
        );
    }
}

#[test]
fn number_phrases_resolve() {
    assert_eq!(resolve_number("twenty one"), Some(21));
    assert_eq!(resolve_number("one hundred twenty"), Some(120));
    assert_eq!(resolve_number("two thousand"), Some(2000));
    assert_eq!(resolve_number("banana"), None);
}

#[test]
fn normalization_is_idempotent() {
    let samples = [
        "Set TEMPO to 120!!",
        "go to the 3rd page...",
        "set a timer for 2:30; then GO",
        "twenty-one   bars",
        "  \t\n",
        "ünïcödé 21st ÉIGHTH",
        "what's up?",
    ];

    for sample in samples {
        let once = normalize(sample);
        assert_eq!(normalize(&once), once, "sample: {:?}", sample);
    }
}

#[test]
fn documented_examples() {
    assert_eq!(classify("start"), Action::StartMetronome);
    assert_eq!(classify("stop the metronome"), Action::StopMetronome);
    assert_eq!(
        classify("flip every four bars"),
        Action::SchedulePageTurn { bars: 4 }
    );
    assert_eq!(classify("go to page three"), Action::GoToPage { page: 3 });
    assert_eq!(
        classify("set tempo to one hundred twenty"),
        Action::SetBpm { bpm: 120 }
    );
    assert_eq!(classify("faster by ten"), Action::AdjustBpm { change: 10 });
    assert_eq!(classify("faster"), Action::AdjustBpm { change: 5 });
    assert_eq!(
        classify("set a timer for 2 minutes"),
        Action::SetTimer {
            ms: 120_000,
            start: false
        }
    );
    assert_eq!(
        classify("asdkjasd"),
        Action::Unknown {
            command: "asdkjasd".to_string()
        }
    );
}

#[test]
fn explicit_tempo_is_clamped() {
    assert_eq!(classify("set tempo to 500"), Action::SetBpm { bpm: 300 });
    assert_eq!(classify("set tempo to 5"), Action::SetBpm { bpm: 40 });
}

#[test]
fn timer_block_takes_precedence_over_stop() {
    let engine = create_engine().unwrap();
    let result = engine.parse("cancel timer");
    assert_eq!(result.action, Action::CancelTimer);
    assert_eq!(result.rule, RuleId::Timer);

    assert_eq!(classify("stop the timer for 5 seconds"), Action::CancelTimer);
    assert_eq!(classify("pause timer 10"), Action::PauseTimer);
    assert_eq!(classify("resume the countdown at 1:30"), Action::ResumeTimer);
}

#[test]
fn zero_never_becomes_a_tempo() {
    assert!(classify("tempo zero").is_unknown());
    assert!(classify("tempo 0").is_unknown());
}

#[test]
fn durations() {
    assert_eq!(resolve_duration_ms("1:05"), Some(65_000));
    assert_eq!(resolve_duration_ms("45s"), Some(45_000));
    assert_eq!(resolve_duration_ms("3 minutes"), Some(180_000));
    assert_eq!(resolve_duration_ms("twenty"), Some(20_000));
    assert_eq!(resolve_duration_ms("soon"), None);
}

#[test]
fn rehearsal_session() {
    let session = [
        ("play the click", Action::StartMetronome),
        ("tempo ninety", Action::SetBpm { bpm: 90 }),
        ("speed up by 4", Action::AdjustBpm { change: 4 }),
        (
            "eighth notes",
            Action::SetSubdivision {
                subdivision: Subdivision::Eighth,
            },
        ),
        ("next page", Action::NextPage),
        ("turn page every 16 bars", Action::SchedulePageTurn { bars: 16 }),
        ("back", Action::PreviousPage),
        (
            "start a timer for 10 minutes",
            Action::SetTimer {
                ms: 600_000,
                start: true,
            },
        ),
        ("how much time is left on the countdown", Action::TimeLeft),
        ("halt", Action::StopMetronome),
    ];

    for (command, expected) in session {
        assert_eq!(classify(command), expected, "command: {:?}", command);
    }
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = create_engine().unwrap();
    let commands = ["start", "page 4", "faster by ten", "asdkjasd", "cancel timer"];

    std::thread::scope(|scope| {
        let handles: Vec<_> = commands
            .iter()
            .map(|command| {
                let engine = &engine;
                scope.spawn(move || (0..100).map(|_| engine.classify(command)).last())
            })
            .collect();

        for (handle, command) in handles.into_iter().zip(commands) {
            let action = handle.join().unwrap().unwrap();
            assert_eq!(action, engine.classify(command));
        }
    });
}
